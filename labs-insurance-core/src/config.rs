//! Mod configuration.
//!
//! Loaded once at startup from a JSON file. Every key is optional; missing
//! keys take the defaults below.

use crate::traders::PRAPOR_ID;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading or validating the mod config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("minReturnHours ({min}) is greater than maxReturnHours ({max})")]
    ReturnWindow { min: u32, max: u32 },

    #[error("returnChancePercent must be between 0 and 100, got {0}")]
    ReturnChance(u8),

    #[error("priceCoefficient must be a non-negative number, got {0}")]
    PriceCoefficient(f64),

    #[error("fallbackTraderId must not be empty")]
    EmptyFallbackTrader,
}

/// Settings for the labs insurance mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModConfig {
    /// Offer insurance at Fence and exempt his claims from the labs wipe.
    pub enable_fence_insurance: bool,

    /// Earliest return, in hours after the raid.
    pub min_return_hours: u32,

    /// Latest return, in hours after the raid.
    pub max_return_hours: u32,

    /// How long returned items wait in the mailbox, in hours.
    pub max_storage_time_hours: u32,

    /// Fence's insurance price coefficient, applied to every loyalty level.
    pub price_coefficient: f64,

    /// Chance that an insured item survives the raid, in percent.
    pub return_chance_percent: u8,

    /// Allow insurance returns from labs for every trader.
    pub labs_returns_enabled: bool,

    /// Log every patched value at info level.
    pub debug: bool,

    /// Trader whose failure messages are used when a trader has none.
    pub fallback_trader_id: String,
}

impl Default for ModConfig {
    fn default() -> Self {
        Self {
            enable_fence_insurance: true,
            min_return_hours: 12,
            max_return_hours: 24,
            max_storage_time_hours: 96,
            price_coefficient: 0.2,
            return_chance_percent: 75,
            labs_returns_enabled: false,
            debug: false,
            fallback_trader_id: PRAPOR_ID.to_string(),
        }
    }
}

impl ModConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// Write the config as pretty JSON.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_return_hours > self.max_return_hours {
            return Err(ConfigError::ReturnWindow {
                min: self.min_return_hours,
                max: self.max_return_hours,
            });
        }
        if self.return_chance_percent > 100 {
            return Err(ConfigError::ReturnChance(self.return_chance_percent));
        }
        if !self.price_coefficient.is_finite() || self.price_coefficient < 0.0 {
            return Err(ConfigError::PriceCoefficient(self.price_coefficient));
        }
        if self.fallback_trader_id.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackTrader);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ModConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ModConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ModConfig::from_json_str(
            r#"{ "enableFenceInsurance": false, "returnChancePercent": 40, "debug": true }"#,
        )
        .unwrap();
        assert!(!config.enable_fence_insurance);
        assert_eq!(config.return_chance_percent, 40);
        assert!(config.debug);
        assert_eq!(config.max_return_hours, 24);
    }

    #[test]
    fn test_inverted_return_window_rejected() {
        let err = ModConfig::from_json_str(r#"{ "minReturnHours": 30, "maxReturnHours": 10 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReturnWindow { min: 30, max: 10 }));
    }

    #[test]
    fn test_return_chance_over_100_rejected() {
        let err = ModConfig::from_json_str(r#"{ "returnChancePercent": 101 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ReturnChance(101)));
    }

    #[test]
    fn test_negative_price_coefficient_rejected() {
        let err = ModConfig::from_json_str(r#"{ "priceCoefficient": -0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::PriceCoefficient(_)));
    }

    #[test]
    fn test_blank_fallback_trader_rejected() {
        let err = ModConfig::from_json_str(r#"{ "fallbackTraderId": " " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyFallbackTrader));
    }

    #[test]
    fn test_malformed_json() {
        let err = ModConfig::from_json_str(r#"{ "debug": "yes" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ModConfig {
            min_return_hours: 2,
            max_return_hours: 3,
            ..ModConfig::default()
        };
        config.save_json(&path).await.unwrap();

        let loaded = ModConfig::load_json(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = ModConfig::load_json("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
