//! Activity levels and the label normalizer
//!
//! Stored profiles carry activity labels from two vocabularies: the
//! machine form ("lightly active") and the descriptive form
//! ("Light Exercise (1-2 days/week)"). Both resolve to the same level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TdeeError;

/// Baseline daily activity, ordered from least to most active
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityLevel {
    #[serde(rename = "bmr")]
    Bmr,
    #[serde(rename = "sedentary")]
    Sedentary,
    #[serde(rename = "lightly active")]
    LightlyActive,
    #[serde(rename = "moderately active")]
    ModeratelyActive,
    #[serde(rename = "very active")]
    VeryActive,
    #[serde(rename = "extra active")]
    ExtraActive,
}

impl ActivityLevel {
    /// Fraction of BMR burned through baseline activity
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Bmr => 1.0,
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.3,
            ActivityLevel::ModeratelyActive => 1.4,
            ActivityLevel::VeryActive => 1.55,
            ActivityLevel::ExtraActive => 1.7,
        }
    }

    /// Machine-readable label, as written to the profile store
    pub fn canonical_label(&self) -> &'static str {
        match self {
            ActivityLevel::Bmr => "bmr",
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly active",
            ActivityLevel::ModeratelyActive => "moderately active",
            ActivityLevel::VeryActive => "very active",
            ActivityLevel::ExtraActive => "extra active",
        }
    }

    /// Human-readable label shown in the level picker
    pub fn display_label(&self) -> &'static str {
        match self {
            ActivityLevel::Bmr => "BMR Only",
            ActivityLevel::Sedentary => "Sedentary (office job)",
            ActivityLevel::LightlyActive => "Light Exercise (1-2 days/week)",
            ActivityLevel::ModeratelyActive => "Moderate Exercise (3-5 days/week)",
            ActivityLevel::VeryActive => "Heavy Exercise (6-7 days/week)",
            ActivityLevel::ExtraActive => "Athlete (2x per day)",
        }
    }

    /// Descriptive label as it appears in stored profiles.
    ///
    /// "BMR Only" is picker text and never a stored label, so it has none.
    pub fn stored_display_label(&self) -> Option<&'static str> {
        match self {
            ActivityLevel::Bmr => None,
            _ => Some(self.display_label()),
        }
    }

    /// All levels for iteration, least active first
    pub fn all() -> &'static [ActivityLevel] {
        &[
            ActivityLevel::Bmr,
            ActivityLevel::Sedentary,
            ActivityLevel::LightlyActive,
            ActivityLevel::ModeratelyActive,
            ActivityLevel::VeryActive,
            ActivityLevel::ExtraActive,
        ]
    }

    /// Resolve a label from either vocabulary, falling back to keyword matching.
    ///
    /// Unlike [`get_activity_multiplier`], a label that matches nothing is an
    /// error instead of silently becoming sedentary.
    pub fn resolve(label: &str) -> Result<Self, TdeeError> {
        let normalized = label.trim().to_lowercase();
        exact_match(&normalized)
            .or_else(|| keyword_match(&normalized))
            .ok_or_else(|| TdeeError::UnknownActivityLevel(label.to_string()))
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_label())
    }
}

/// Exact labels only (either vocabulary, any case). No keyword guessing.
impl FromStr for ActivityLevel {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        exact_match(&s.trim().to_lowercase())
            .ok_or_else(|| TdeeError::UnknownActivityLevel(s.to_string()))
    }
}

/// Normalized activity multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityMultiplier {
    pub level: ActivityLevel,
    pub base: f64,
}

impl From<ActivityLevel> for ActivityMultiplier {
    fn from(level: ActivityLevel) -> Self {
        Self { level, base: level.multiplier() }
    }
}

/// Keyword fallbacks, checked in order; first hit wins
const KEYWORDS: &[(&[&str], ActivityLevel)] = &[
    (&["sedentary", "office"], ActivityLevel::Sedentary),
    (&["light", "1-2"], ActivityLevel::LightlyActive),
    (&["moderate", "3-5"], ActivityLevel::ModeratelyActive),
    (&["heavy", "6-7"], ActivityLevel::VeryActive),
    (&["athlete", "2x"], ActivityLevel::ExtraActive),
];

fn exact_match(normalized: &str) -> Option<ActivityLevel> {
    ActivityLevel::all().iter().copied().find(|level| {
        level.canonical_label() == normalized
            || level.stored_display_label().is_some_and(|l| l.to_lowercase() == normalized)
    })
}

fn keyword_match(normalized: &str) -> Option<ActivityLevel> {
    KEYWORDS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| normalized.contains(n)))
        .map(|(_, level)| *level)
}

/// Lenient lookup: any label resolves, unknown ones to sedentary.
///
/// Compatibility shim for free-text labels read back from stored profiles.
/// New code should parse into [`ActivityLevel`] at the boundary instead.
pub fn get_activity_multiplier(label: &str) -> ActivityMultiplier {
    match ActivityLevel::resolve(label) {
        Ok(level) => level.into(),
        Err(_) => {
            warn!("Unknown activity level: {:?}, using sedentary", label);
            ActivityLevel::Sedentary.into()
        }
    }
}
