//! Worked examples for the TDEE engine through the public API

use fitcommit::tdee::{
    ActivityLevel, ExerciseFrequency, TdeeInputs, estimate, get_activity_multiplier,
    get_exercise_frequency_bonus, try_estimate,
};
use fitcommit::{TdeeError, calculate_bmr, calculate_tdee, calculate_tdee_with_defaults};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
}

#[test]
fn test_bmr_80kg_20_percent() {
    assert_close(calculate_bmr(80.0, 20.0), 1752.4);
}

#[test]
fn test_sedentary_no_exercise() {
    let inputs = TdeeInputs::new(80.0, 20.0, "sedentary").with_exercise_frequency("none");
    assert_close(calculate_tdee(&inputs), 2102.88);
}

#[test]
fn test_heavy_exercise_three_to_four_days() {
    let inputs = TdeeInputs::new(80.0, 20.0, "Heavy Exercise (6-7 days/week)")
        .with_exercise_frequency("3-4");
    assert_close(calculate_tdee(&inputs), 2891.46);
}

#[test]
fn test_defaults_bmr_only() {
    assert_close(calculate_tdee_with_defaults(70.0, "bmr", None, None), 1655.2);
}

#[test]
fn test_both_vocabularies_agree() {
    for level in ActivityLevel::all() {
        let Some(label) = level.stored_display_label() else {
            continue;
        };
        assert_eq!(get_activity_multiplier(level.canonical_label()), get_activity_multiplier(label));
    }
}

#[test]
fn test_bmr_only_label_falls_back_to_sedentary() {
    assert_eq!(get_activity_multiplier("BMR Only").base, 1.2);
    assert_close(calculate_tdee(&TdeeInputs::new(80.0, 20.0, "BMR Only")), 2102.88);
}

#[test]
fn test_unknown_labels_never_fail() {
    assert_eq!(get_activity_multiplier("xyz-unknown").base, 1.2);
    assert_eq!(get_exercise_frequency_bonus("xyz-unknown"), 0.0);
}

#[test]
fn test_repeated_calls_identical() {
    let inputs = TdeeInputs::new(63.2, 27.5, "Moderate Exercise (3-5 days/week)")
        .with_exercise_frequency("daily");
    let first = estimate(&inputs);
    for _ in 0..10 {
        assert_eq!(estimate(&inputs), first);
    }
}

#[test]
fn test_strict_and_lenient_disagree_only_on_bad_input() {
    let bad = TdeeInputs::new(80.0, 20.0, "gardening").with_exercise_frequency("sometimes");
    assert!(matches!(try_estimate(&bad), Err(TdeeError::UnknownActivityLevel(_))));
    assert_eq!(estimate(&bad).activity_level, ActivityLevel::Sedentary);
    assert_eq!(estimate(&bad).exercise_frequency, None);

    let good = TdeeInputs::new(80.0, 20.0, "gardening 1-2 days").with_exercise_frequency("5-6");
    let breakdown = try_estimate(&good).unwrap();
    assert_eq!(breakdown.activity_level, ActivityLevel::LightlyActive);
    assert_eq!(breakdown.exercise_frequency, Some(ExerciseFrequency::FiveToSix));
}

#[test]
fn test_breakdown_json_shape() {
    let inputs = TdeeInputs::new(80.0, 20.0, "very active").with_exercise_frequency("3-4");
    let json = serde_json::to_value(estimate(&inputs)).unwrap();
    assert_eq!(json["activity_level"], "very active");
    assert_eq!(json["exercise_frequency"], "3-4");
    assert!(json["tdee"].as_f64().unwrap() > 2891.0);
}
