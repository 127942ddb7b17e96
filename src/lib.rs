//! fitcommit - body-fat progress tracking and daily calorie estimates
//!
//! The heart of the crate is the [`tdee`] engine: Katch-McArdle BMR scaled by
//! an activity multiplier and an exercise-frequency bonus. Around it sit body
//! metrics, progress history, the body-scan service contract and a small
//! SQLite-backed profile store.

pub mod body;
pub mod config;
pub mod db;
pub mod error;
pub mod profile;
pub mod progress;
pub mod scan;
pub mod tdee;

pub use db::{BodyScan, Database};
pub use error::{ScanError, TdeeError};
pub use tdee::{TdeeInputs, calculate_bmr, calculate_tdee, calculate_tdee_with_defaults};
