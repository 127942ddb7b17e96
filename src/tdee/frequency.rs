//! Exercise-frequency buckets and their multiplier bonus

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TdeeError;

/// Structured exercise sessions per week, on top of baseline activity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExerciseFrequency {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "daily")]
    Daily,
}

impl ExerciseFrequency {
    /// Addend to the activity multiplier
    pub fn bonus(&self) -> f64 {
        match self {
            ExerciseFrequency::None => 0.0,
            ExerciseFrequency::OneToTwo => 0.05,
            ExerciseFrequency::ThreeToFour => 0.10,
            ExerciseFrequency::FiveToSix => 0.15,
            ExerciseFrequency::Daily => 0.20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseFrequency::None => "none",
            ExerciseFrequency::OneToTwo => "1-2",
            ExerciseFrequency::ThreeToFour => "3-4",
            ExerciseFrequency::FiveToSix => "5-6",
            ExerciseFrequency::Daily => "daily",
        }
    }

    pub fn all() -> &'static [ExerciseFrequency] {
        &[
            ExerciseFrequency::None,
            ExerciseFrequency::OneToTwo,
            ExerciseFrequency::ThreeToFour,
            ExerciseFrequency::FiveToSix,
            ExerciseFrequency::Daily,
        ]
    }
}

impl fmt::Display for ExerciseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExerciseFrequency {
    type Err = TdeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.label() == normalized)
            .ok_or_else(|| TdeeError::UnknownExerciseFrequency(s.to_string()))
    }
}

/// Bonus for a frequency label; anything unrecognized earns no bonus
pub fn get_exercise_frequency_bonus(label: &str) -> f64 {
    label
        .parse::<ExerciseFrequency>()
        .map(|f| f.bonus())
        .unwrap_or(0.0)
}
