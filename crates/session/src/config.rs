//! Tracker configuration.
//!
//! Every knob has a default; environment variables override individual fields.

use serde::{Deserialize, Serialize};

use grocer_inventory::{DEFAULT_EXPIRY_WINDOW_DAYS, ExpiryMode, ShelfLifePolicy};

use crate::error::ConfigError;

pub const ENV_EXPIRY_WINDOW_DAYS: &str = "GROCER_EXPIRY_WINDOW_DAYS";
pub const ENV_EXPIRY_MODE: &str = "GROCER_EXPIRY_MODE";
pub const ENV_INCLUDE_BOUGHT: &str = "GROCER_INCLUDE_BOUGHT";
pub const ENV_TRACK_OPENED: &str = "GROCER_TRACK_OPENED";
pub const ENV_STRICT_INPUT: &str = "GROCER_STRICT_INPUT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Look-ahead for the "expiring soon" list.
    pub expiry_window_days: u32,
    pub expiry_mode: ExpiryMode,
    /// Whether already-bought items show up in the "expiring soon" list.
    pub include_bought_in_expiring: bool,
    /// Whether item lines carry the `Opened:` segment.
    pub track_opened: bool,
    /// Reject blank names and invalid prices instead of storing them.
    pub strict_input: bool,
    pub shelf_life: ShelfLifePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            expiry_mode: ExpiryMode::default(),
            include_bought_in_expiring: false,
            track_opened: true,
            strict_input: false,
            shelf_life: ShelfLifePolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overridden by `GROCER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_EXPIRY_WINDOW_DAYS) {
            config.expiry_window_days = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::invalid(ENV_EXPIRY_WINDOW_DAYS, raw.as_str(), e.to_string())
            })?;
        }
        if let Some(raw) = lookup(ENV_EXPIRY_MODE) {
            config.expiry_mode = raw
                .parse()
                .map_err(|e: grocer_core::DomainError| {
                    ConfigError::invalid(ENV_EXPIRY_MODE, raw.as_str(), e.to_string())
                })?;
        }
        if let Some(raw) = lookup(ENV_INCLUDE_BOUGHT) {
            config.include_bought_in_expiring = parse_flag(ENV_INCLUDE_BOUGHT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TRACK_OPENED) {
            config.track_opened = parse_flag(ENV_TRACK_OPENED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRICT_INPUT) {
            config.strict_input = parse_flag(ENV_STRICT_INPUT, &raw)?;
        }

        tracing::debug!(?config, "tracker configuration loaded");
        Ok(config)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_keep_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.expiry_window_days, 3);
        assert_eq!(config.expiry_mode, ExpiryMode::DateWindow);
        assert!(!config.include_bought_in_expiring);
        assert!(config.track_opened);
        assert!(!config.strict_input);
    }

    #[test]
    fn variables_override_fields() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (ENV_EXPIRY_WINDOW_DAYS, "5"),
            (ENV_EXPIRY_MODE, "unclamped"),
            (ENV_INCLUDE_BOUGHT, "yes"),
            (ENV_TRACK_OPENED, "0"),
            (ENV_STRICT_INPUT, "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.expiry_window_days, 5);
        assert_eq!(config.expiry_mode, ExpiryMode::Unclamped);
        assert!(config.include_bought_in_expiring);
        assert!(!config.track_opened);
        assert!(config.strict_input);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = TrackerConfig::from_lookup(lookup(&[(ENV_EXPIRY_WINDOW_DAYS, "-2")])).unwrap_err();
        let ConfigError::InvalidValue { key, value, .. } = err;
        assert_eq!(key, ENV_EXPIRY_WINDOW_DAYS);
        assert_eq!(value, "-2");

        assert!(TrackerConfig::from_lookup(lookup(&[(ENV_STRICT_INPUT, "maybe")])).is_err());
        assert!(TrackerConfig::from_lookup(lookup(&[(ENV_EXPIRY_MODE, "never")])).is_err());
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"expiry_window_days": 7, "expiry_mode": "unclamped"}"#).unwrap();
        assert_eq!(config.expiry_window_days, 7);
        assert_eq!(config.expiry_mode, ExpiryMode::Unclamped);
        assert_eq!(config.shelf_life, ShelfLifePolicy::default());
    }
}
