//! Body-scan analysis contract
//!
//! Request/response shapes for the external image-analysis service and
//! the after-photo generator, plus extraction of a body-fat number from
//! the service's free-text answer. No HTTP client lives here.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::Gender;
use crate::error::ScanError;
use crate::tdee::DEFAULT_BODY_FAT_PERCENTAGE;

/// "18.5%" style
static PERCENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").ok());

/// "around 18.5", "approximately 20"
static HEDGED_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:around|approximately|about|roughly|close to)\s*(\d+(?:\.\d+)?)").ok()
});

static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").ok());

/// Payload for the image-analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImagesRequest {
    /// Front, side and back photo URLs, in that order
    pub images: Vec<String>,
    pub age: Option<u32>,
    pub height_cms: Option<f64>,
    pub weight_kgs: Option<f64>,
}

impl AnalyzeImagesRequest {
    pub fn new(front: impl Into<String>, side: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            images: vec![front.into(), side.into(), back.into()],
            age: None,
            height_cms: None,
            weight_kgs: None,
        }
    }
}

/// Answer from the image-analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImagesResponse {
    /// Free text, e.g. "Estimated body fat is around 18.5%"
    pub body_fat: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl AnalyzeImagesResponse {
    /// Body fat as a percentage, or an error naming the unparseable text
    pub fn body_fat_percentage(&self) -> Result<f64, ScanError> {
        extract_body_fat_percentage(&self.body_fat)
            .ok_or_else(|| ScanError::NoBodyFatFound(self.body_fat.clone()))
    }
}

/// Parse the raw response body of the analysis endpoint
pub fn parse_analysis_response(raw: &str) -> Result<AnalyzeImagesResponse, ScanError> {
    if raw.trim().is_empty() {
        return Err(ScanError::EmptyResponse);
    }
    Ok(serde_json::from_str(raw)?)
}

fn first_capture(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<f64> {
    let regex = (**pattern).as_ref()?;
    regex
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Pull a body-fat percentage out of free text.
///
/// Tries an explicit percentage first, then a hedged phrase, then any
/// number. Values outside (0, 100) are treated as no match.
pub fn extract_body_fat_percentage(text: &str) -> Option<f64> {
    let value = first_capture(&PERCENT_PATTERN, text)
        .or_else(|| first_capture(&HEDGED_PATTERN, text))
        .or_else(|| first_capture(&NUMBER_PATTERN, text));

    debug!(text, ?value, "Extracted body fat");
    value.filter(|v| *v > 0.0 && *v < 100.0)
}

/// Payload for the after-photo generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfterPhotoRequest {
    pub image_url: String,
    pub body_fat_percent: f64,
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub duration_weeks: u32,
    pub correlation_id: String,
}

impl AfterPhotoRequest {
    /// Uses the default body fat when no scan exists yet
    pub fn new(image_url: impl Into<String>, latest_body_fat: Option<f64>, duration_weeks: u32) -> Self {
        Self {
            image_url: image_url.into(),
            body_fat_percent: latest_body_fat.unwrap_or(DEFAULT_BODY_FAT_PERCENTAGE),
            weight: None,
            gender: None,
            duration_weeks,
            correlation_id: format!("session_{}", Utc::now().timestamp_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_percentage() {
        assert_eq!(extract_body_fat_percentage("Estimated body fat is around 18.5%"), Some(18.5));
        assert_eq!(extract_body_fat_percentage("22 %"), Some(22.0));
    }

    #[test]
    fn test_percentage_wins_over_earlier_number() {
        assert_eq!(
            extract_body_fat_percentage("Based on 3 photos, body fat is 21.3%"),
            Some(21.3)
        );
    }

    #[test]
    fn test_extract_hedged_phrase() {
        assert_eq!(
            extract_body_fat_percentage("In 3 photos you look to be approximately 24 percent"),
            Some(24.0)
        );
    }

    #[test]
    fn test_extract_bare_number() {
        assert_eq!(extract_body_fat_percentage("17"), Some(17.0));
    }

    #[test]
    fn test_extract_nothing() {
        assert_eq!(extract_body_fat_percentage("unable to estimate"), None);
        assert_eq!(extract_body_fat_percentage("0%"), None);
        assert_eq!(extract_body_fat_percentage("150%"), None);
    }

    #[test]
    fn test_parse_response() {
        let response =
            parse_analysis_response(r#"{"bodyFat": "around 19%", "rationale": "visible abs"}"#).unwrap();
        assert_eq!(response.rationale.as_deref(), Some("visible abs"));
        assert_eq!(response.body_fat_percentage().unwrap(), 19.0);
    }

    #[test]
    fn test_parse_response_without_rationale() {
        let response = parse_analysis_response(r#"{"bodyFat": "16.2%"}"#).unwrap();
        assert_eq!(response.rationale, None);
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(matches!(parse_analysis_response("  \n"), Err(ScanError::EmptyResponse)));
    }

    #[test]
    fn test_parse_invalid_response() {
        assert!(matches!(parse_analysis_response("<html>"), Err(ScanError::InvalidResponse(_))));
    }

    #[test]
    fn test_unparseable_body_fat() {
        let response = parse_analysis_response(r#"{"bodyFat": "n/a"}"#).unwrap();
        assert!(matches!(response.body_fat_percentage(), Err(ScanError::NoBodyFatFound(_))));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let mut request = AnalyzeImagesRequest::new("f.jpg", "s.jpg", "b.jpg");
        request.height_cms = Some(180.0);
        request.weight_kgs = Some(80.0);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["images"][1], "s.jpg");
        assert_eq!(json["heightCms"], 180.0);
        assert_eq!(json["weightKgs"], 80.0);
    }

    #[test]
    fn test_after_photo_defaults_body_fat() {
        let request = AfterPhotoRequest::new("base.jpg", None, 12);
        assert_eq!(request.body_fat_percent, 15.0);
        assert!(request.correlation_id.starts_with("session_"));

        let request = AfterPhotoRequest::new("base.jpg", Some(21.0), 12);
        assert_eq!(request.body_fat_percent, 21.0);
    }
}
