//! Configuration - defaults, optional TOML file, `FITCOMMIT_*` env overrides

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tdee::{DEFAULT_BODY_FAT_PERCENTAGE, ExerciseFrequency};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "fitcommit.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file for profiles and progress history
    pub database_path: String,
    /// Profile id used when the CLI is not told otherwise
    pub user_id: String,
    /// Body fat the progress chart treats as "goal reached"
    pub target_body_fat: f64,
    /// Assumed body fat before the first scan
    pub default_body_fat_percentage: f64,
    pub default_exercise_frequency: ExerciseFrequency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "fitcommit.db".to_string(),
            user_id: "local".to_string(),
            target_body_fat: 12.0,
            default_body_fat_percentage: DEFAULT_BODY_FAT_PERCENTAGE,
            default_exercise_frequency: ExerciseFrequency::None,
        }
    }
}

impl Config {
    /// Load from `path` (or `fitcommit.toml` if present), then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `FITCOMMIT_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FITCOMMIT_DB") {
            self.database_path = path;
        }
        if let Some(user) = lookup("FITCOMMIT_USER") {
            self.user_id = user;
        }
        if let Some(value) = lookup("FITCOMMIT_TARGET_BODY_FAT") {
            self.target_body_fat = value
                .parse()
                .with_context(|| format!("FITCOMMIT_TARGET_BODY_FAT is not a number: {}", value))?;
        }
        if let Some(value) = lookup("FITCOMMIT_DEFAULT_BODY_FAT") {
            self.default_body_fat_percentage = value
                .parse()
                .with_context(|| format!("FITCOMMIT_DEFAULT_BODY_FAT is not a number: {}", value))?;
        }
        if let Some(value) = lookup("FITCOMMIT_EXERCISE_FREQUENCY") {
            self.default_exercise_frequency = value.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database_path, "fitcommit.db");
        assert_eq!(config.target_body_fat, 12.0);
        assert_eq!(config.default_body_fat_percentage, 15.0);
        assert_eq!(config.default_exercise_frequency, ExerciseFrequency::None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            target_body_fat = 10.0
            default_exercise_frequency = "3-4"
            "#,
        )
        .unwrap();
        assert_eq!(config.target_body_fat, 10.0);
        assert_eq!(config.default_exercise_frequency, ExerciseFrequency::ThreeToFour);
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("target_body_fat = \"ten\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FITCOMMIT_DB", "/tmp/other.db"),
            ("FITCOMMIT_TARGET_BODY_FAT", "14.5"),
            ("FITCOMMIT_EXERCISE_FREQUENCY", "Daily"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_path, "/tmp/other.db");
        assert_eq!(config.target_body_fat, 14.5);
        assert_eq!(config.default_exercise_frequency, ExerciseFrequency::Daily);
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn test_env_override_bad_number() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "FITCOMMIT_DEFAULT_BODY_FAT").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_id = \"alice\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.user_id, "alice");
    }
}
