//! User profile and the derived BMI/TDEE fields stored alongside it

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::body::{Gender, calculate_bmi, format_bmi};
use crate::config::Config;
use crate::tdee::{self, ActivityLevel, TdeeBreakdown, TdeeInputs};

/// Profile record as kept in the store
///
/// `activity_level` and `exercise_frequency` are free text: older records
/// hold descriptive labels, newer ones canonical ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub exercise_frequency: Option<String>,
    /// BMI with two decimals
    pub bmi_bmi: Option<String>,
    /// TDEE as a rounded integer string
    pub tdee_tdee: Option<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Activity level as the closed enum, if the stored label resolves
    pub fn activity(&self) -> Option<ActivityLevel> {
        self.activity_level
            .as_deref()
            .and_then(|label| ActivityLevel::resolve(label).ok())
    }

    /// Engine inputs, or `None` without a weight.
    ///
    /// Missing body fat falls back to the configured default; missing
    /// activity to sedentary; missing frequency to the configured default.
    pub fn tdee_inputs(&self, latest_body_fat: Option<f64>, config: &Config) -> Option<TdeeInputs> {
        let weight_kg = self.weight_kg?;
        let activity = self
            .activity_level
            .clone()
            .unwrap_or_else(|| ActivityLevel::Sedentary.canonical_label().to_string());
        let frequency = self
            .exercise_frequency
            .clone()
            .unwrap_or_else(|| config.default_exercise_frequency.label().to_string());

        Some(
            TdeeInputs::new(
                weight_kg,
                latest_body_fat.unwrap_or(config.default_body_fat_percentage),
                activity,
            )
            .with_exercise_frequency(frequency),
        )
    }

    /// Recompute `bmi_bmi` and `tdee_tdee`; returns the TDEE breakdown if computed
    pub fn refresh_metrics(&mut self, latest_body_fat: Option<f64>, config: &Config) -> Option<TdeeBreakdown> {
        if let (Some(weight), Some(height)) = (self.weight_kg, self.height_cm) {
            self.bmi_bmi = calculate_bmi(weight, height).ok().map(format_bmi);
        }

        let inputs = self.tdee_inputs(latest_body_fat, config)?;
        let breakdown = tdee::estimate(&inputs);
        self.tdee_tdee = Some(breakdown.rounded().to_string());

        info!(
            user_id = %self.id,
            bmi = self.bmi_bmi.as_deref().unwrap_or("-"),
            tdee = breakdown.rounded(),
            "Profile metrics refreshed"
        );
        Some(breakdown)
    }

    /// Stored TDEE as whole kcal; tolerates older one-decimal values
    pub fn tdee_kcal(&self) -> Option<i64> {
        let value: f64 = self.tdee_tdee.as_deref()?.trim().parse().ok()?;
        Some(value.round() as i64)
    }
}
