//! Body metrics that don't need a scan - BMI and Mifflin-St Jeor BMR

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TdeeError;

/// Sex used by the Mifflin-St Jeor offset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    fn mifflin_offset(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

fn check_weight(weight_kg: f64) -> Result<(), TdeeError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(TdeeError::InvalidWeight(weight_kg));
    }
    Ok(())
}

fn check_height(height_cm: f64) -> Result<(), TdeeError> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(TdeeError::InvalidHeight(height_cm));
    }
    Ok(())
}

/// Body mass index: weight / height(m)^2
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, TdeeError> {
    check_weight(weight_kg)?;
    check_height(height_cm)?;
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Two decimals, the format stored in `bmi_bmi`
pub fn format_bmi(bmi: f64) -> String {
    format!("{:.2}", bmi)
}

/// Mifflin-St Jeor BMR (1990), used when no body-fat estimate exists
///
/// ```text
/// BMR = 10 * weight + 6.25 * height - 5 * age + (5 male | -161 female)
/// ```
pub fn calculate_mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + gender.mifflin_offset()
}

/// Validated [`calculate_mifflin_st_jeor`]
pub fn try_calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
) -> Result<f64, TdeeError> {
    check_weight(weight_kg)?;
    check_height(height_cm)?;
    if age == 0 || age > 120 {
        return Err(TdeeError::InvalidAge(age));
    }
    Ok(calculate_mifflin_st_jeor(weight_kg, height_cm, age, gender))
}
