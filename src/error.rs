//! Error types for metric calculations and body-scan parsing

use thiserror::Error;

/// Errors returned by the validated calculation paths
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TdeeError {
    /// Weight must be a positive, finite number of kilograms
    #[error("Invalid weight: {0} kg (must be > 0)")]
    InvalidWeight(f64),

    /// Body fat must be a percentage in [0, 100)
    #[error("Invalid body fat percentage: {0} (must be in [0, 100))")]
    InvalidBodyFatPercentage(f64),

    /// Height must be a positive, finite number of centimeters
    #[error("Invalid height: {0} cm (must be > 0)")]
    InvalidHeight(f64),

    #[error("Invalid age: {0}")]
    InvalidAge(u32),

    /// Label matched neither vocabulary nor any fuzzy keyword
    #[error("Unknown activity level: {0}")]
    UnknownActivityLevel(String),

    #[error("Unknown exercise frequency: {0}")]
    UnknownExerciseFrequency(String),
}

/// Errors from the body-scan analysis contract
#[derive(Error, Debug)]
pub enum ScanError {
    /// The analysis service answered with an empty body
    #[error("Server returned an empty response")]
    EmptyResponse,

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The response text had no usable body-fat number
    #[error("No body fat percentage found in: {0:?}")]
    NoBodyFatFound(String),
}
