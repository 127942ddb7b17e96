//! TDEE engine - daily calorie needs from weight, body fat and activity
//!
//! TDEE = BMR x (activity multiplier + exercise-frequency bonus), with BMR
//! from the Katch-McArdle lean-mass formula:
//!
//! ```text
//! lean_mass = weight - weight * (body_fat / 100)
//! BMR       = 370 + 21.6 * lean_mass
//! ```
//!
//! Two flavours of every entry point:
//! - lenient (`calculate_*`, `estimate`): never fails, unknown labels fall back
//!   to defaults, numbers are not range-checked
//! - strict (`try_*`): validates inputs and labels, returns [`TdeeError`]

pub mod activity;
pub mod frequency;

pub use activity::{ActivityLevel, ActivityMultiplier, get_activity_multiplier};
pub use frequency::{ExerciseFrequency, get_exercise_frequency_bonus};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TdeeError;

/// Katch-McArdle constant term (kcal/day)
pub const KATCH_MCARDLE_BASE: f64 = 370.0;

/// Katch-McArdle kcal/day per kg of lean mass
pub const KATCH_MCARDLE_LEAN_FACTOR: f64 = 21.6;

/// Body fat assumed before the first body scan
pub const DEFAULT_BODY_FAT_PERCENTAGE: f64 = 15.0;

/// Inputs for a TDEE estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdeeInputs {
    pub weight_kg: f64,
    /// Percentage units: 18.5, not 0.185
    pub body_fat_percentage: f64,
    /// Free-text label in either vocabulary
    pub activity_level: String,
    /// `None` means no structured exercise
    #[serde(default)]
    pub exercise_frequency: Option<String>,
}

impl TdeeInputs {
    pub fn new(weight_kg: f64, body_fat_percentage: f64, activity_level: impl Into<String>) -> Self {
        Self {
            weight_kg,
            body_fat_percentage,
            activity_level: activity_level.into(),
            exercise_frequency: None,
        }
    }

    pub fn with_exercise_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.exercise_frequency = Some(frequency.into());
        self
    }

    fn frequency_label(&self) -> &str {
        self.exercise_frequency.as_deref().unwrap_or("none")
    }
}

/// Every intermediate value of a TDEE estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TdeeBreakdown {
    pub weight_kg: f64,
    pub body_fat_percentage: f64,
    pub lean_mass_kg: f64,
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    pub base_multiplier: f64,
    /// `None` when the label matched no bucket (lenient path only)
    pub exercise_frequency: Option<ExerciseFrequency>,
    pub exercise_bonus: f64,
    pub total_multiplier: f64,
    pub tdee: f64,
}

impl TdeeBreakdown {
    fn compose(
        weight_kg: f64,
        body_fat_percentage: f64,
        activity: ActivityMultiplier,
        exercise_frequency: Option<ExerciseFrequency>,
    ) -> Self {
        let lean_mass_kg = lean_mass(weight_kg, body_fat_percentage);
        let bmr = KATCH_MCARDLE_BASE + KATCH_MCARDLE_LEAN_FACTOR * lean_mass_kg;
        let exercise_bonus = exercise_frequency.map(|f| f.bonus()).unwrap_or(0.0);
        let total_multiplier = activity.base + exercise_bonus;
        let tdee = bmr * total_multiplier;

        debug!(
            weight_kg,
            body_fat_percentage,
            activity_level = %activity.level,
            bmr = bmr.round(),
            base_multiplier = activity.base,
            exercise_bonus,
            total_multiplier,
            tdee = tdee.round(),
            "TDEE calculation"
        );

        Self {
            weight_kg,
            body_fat_percentage,
            lean_mass_kg,
            bmr,
            activity_level: activity.level,
            base_multiplier: activity.base,
            exercise_frequency,
            exercise_bonus,
            total_multiplier,
            tdee,
        }
    }

    /// Whole kcal, as persisted to the profile
    pub fn rounded(&self) -> i64 {
        self.tdee.round() as i64
    }
}

fn lean_mass(weight_kg: f64, body_fat_percentage: f64) -> f64 {
    weight_kg - weight_kg * (body_fat_percentage / 100.0)
}

/// Katch-McArdle BMR. No range checks; see [`try_calculate_bmr`].
pub fn calculate_bmr(weight_kg: f64, body_fat_percentage: f64) -> f64 {
    KATCH_MCARDLE_BASE + KATCH_MCARDLE_LEAN_FACTOR * lean_mass(weight_kg, body_fat_percentage)
}

/// Katch-McArdle BMR for physically valid inputs only
///
/// # Errors
///
/// - [`TdeeError::InvalidWeight`] unless weight is finite and > 0
/// - [`TdeeError::InvalidBodyFatPercentage`] unless body fat is finite and in [0, 100)
pub fn try_calculate_bmr(weight_kg: f64, body_fat_percentage: f64) -> Result<f64, TdeeError> {
    validate(weight_kg, body_fat_percentage)?;
    Ok(calculate_bmr(weight_kg, body_fat_percentage))
}

fn validate(weight_kg: f64, body_fat_percentage: f64) -> Result<(), TdeeError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(TdeeError::InvalidWeight(weight_kg));
    }
    // 100% would leave no lean mass
    if !body_fat_percentage.is_finite() || !(0.0..100.0).contains(&body_fat_percentage) {
        return Err(TdeeError::InvalidBodyFatPercentage(body_fat_percentage));
    }
    Ok(())
}

/// Lenient estimate with all intermediate values
pub fn estimate(inputs: &TdeeInputs) -> TdeeBreakdown {
    let activity = get_activity_multiplier(&inputs.activity_level);
    let frequency = inputs.frequency_label().parse::<ExerciseFrequency>().ok();
    TdeeBreakdown::compose(inputs.weight_kg, inputs.body_fat_percentage, activity, frequency)
}

/// Strict estimate: validated numbers, labels must resolve
pub fn try_estimate(inputs: &TdeeInputs) -> Result<TdeeBreakdown, TdeeError> {
    validate(inputs.weight_kg, inputs.body_fat_percentage)?;
    let level = ActivityLevel::resolve(&inputs.activity_level)?;
    let frequency = inputs.frequency_label().parse::<ExerciseFrequency>()?;
    Ok(TdeeBreakdown::compose(
        inputs.weight_kg,
        inputs.body_fat_percentage,
        level.into(),
        Some(frequency),
    ))
}

/// Daily calorie need in kcal. Always returns a number.
pub fn calculate_tdee(inputs: &TdeeInputs) -> f64 {
    estimate(inputs).tdee
}

/// [`calculate_tdee`] for callers without a scan yet.
///
/// Missing frequency means `"none"`, missing body fat means
/// [`DEFAULT_BODY_FAT_PERCENTAGE`].
pub fn calculate_tdee_with_defaults(
    weight_kg: f64,
    activity_level: &str,
    exercise_frequency: Option<&str>,
    body_fat_percentage: Option<f64>,
) -> f64 {
    let mut inputs = TdeeInputs::new(
        weight_kg,
        body_fat_percentage.unwrap_or(DEFAULT_BODY_FAT_PERCENTAGE),
        activity_level,
    );
    inputs.exercise_frequency = exercise_frequency.map(str::to_string);
    calculate_tdee(&inputs)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_frequency() -> impl Strategy<Value = ExerciseFrequency> {
        prop::sample::select(ExerciseFrequency::all().to_vec())
    }

    fn any_level() -> impl Strategy<Value = ActivityLevel> {
        prop::sample::select(ActivityLevel::all().to_vec())
    }

    proptest! {
        /// Property: same inputs, same output
        #[test]
        fn test_deterministic(
            weight in 30.0f64..250.0,
            body_fat in 2.0f64..70.0,
            level in any_level(),
            freq in any_frequency(),
        ) {
            let inputs = TdeeInputs::new(weight, body_fat, level.canonical_label())
                .with_exercise_frequency(freq.label());
            prop_assert_eq!(calculate_tdee(&inputs), calculate_tdee(&inputs));
        }

        /// Property: more active level, strictly higher TDEE
        #[test]
        fn test_monotonic_in_activity(
            weight in 30.0f64..250.0,
            body_fat in 2.0f64..70.0,
            freq in any_frequency(),
        ) {
            let tdees: Vec<f64> = ActivityLevel::all()
                .iter()
                .map(|l| {
                    let inputs = TdeeInputs::new(weight, body_fat, l.canonical_label())
                        .with_exercise_frequency(freq.label());
                    calculate_tdee(&inputs)
                })
                .collect();
            prop_assert!(tdees.windows(2).all(|w| w[0] < w[1]), "{:?}", tdees);
        }

        /// Property: more frequent exercise never lowers TDEE
        #[test]
        fn test_monotonic_in_frequency(
            weight in 30.0f64..250.0,
            body_fat in 2.0f64..70.0,
            level in any_level(),
        ) {
            let tdees: Vec<f64> = ExerciseFrequency::all()
                .iter()
                .map(|f| {
                    let inputs = TdeeInputs::new(weight, body_fat, level.canonical_label())
                        .with_exercise_frequency(f.label());
                    calculate_tdee(&inputs)
                })
                .collect();
            prop_assert!(tdees.windows(2).all(|w| w[0] <= w[1]), "{:?}", tdees);
        }

        /// Property: strict path accepts everything physically valid
        #[test]
        fn test_strict_accepts_valid_range(
            weight in 0.1f64..500.0,
            body_fat in 0.0f64..99.9,
        ) {
            prop_assert!(try_calculate_bmr(weight, body_fat).is_ok());
        }
    }
}
