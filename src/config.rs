//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "./data/onboarding-settings.json";

/// Runtime configuration for the onboarding driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the onboarding flag and the last record are kept.
    pub settings_path: PathBuf,
    /// Indent the JSON shown on the results screen.
    pub pretty_results: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            pretty_results: true,
        }
    }
}

impl AppConfig {
    /// Build config from `WELLNESS_SETTINGS_PATH` and `WELLNESS_PRETTY_RESULTS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings_path = lookup("WELLNESS_SETTINGS_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.settings_path);

        let pretty_results = match lookup("WELLNESS_PRETTY_RESULTS") {
            Some(raw) => parse_bool("WELLNESS_PRETTY_RESULTS", &raw)?,
            None => defaults.pretty_results,
        };

        Ok(Self {
            settings_path,
            pretty_results,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WELLNESS_SETTINGS_PATH", "/tmp/s.json"),
            ("WELLNESS_PRETTY_RESULTS", "off"),
        ]))
        .unwrap();
        assert_eq!(config.settings_path, PathBuf::from("/tmp/s.json"));
        assert!(!config.pretty_results);
    }

    #[test]
    fn rejects_bad_boolean() {
        let err = AppConfig::from_lookup(lookup(&[("WELLNESS_PRETTY_RESULTS", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("WELLNESS_PRETTY_RESULTS"));
    }
}
