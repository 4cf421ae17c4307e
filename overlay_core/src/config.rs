//! Overlay configuration loading from TOML files

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Widest a health bar attachment is drawn, in scene pixels
pub const DEFAULT_HEALTH_BAR_MAX_WIDTH: f64 = 146.0;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Tunables for the overlay engine; every field has a sensible default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How many history records to retain
    pub history_capacity: usize,
    /// Full width of a health-bar attachment at 100% health
    pub health_bar_max_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            health_bar_max_width: DEFAULT_HEALTH_BAR_MAX_WIDTH,
        }
    }
}

impl OverlayConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: OverlayConfig = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.health_bar_max_width <= 0.0 {
            return Err(ConfigError::ValidationError(
                "health_bar_max_width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.health_bar_max_width, 146.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: OverlayConfig = parse_toml("history_capacity = 10").unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.health_bar_max_width, DEFAULT_HEALTH_BAR_MAX_WIDTH);
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config: OverlayConfig = parse_toml("history_capacity = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let result: Result<OverlayConfig, _> = parse_toml("history_capacity = \"many\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
