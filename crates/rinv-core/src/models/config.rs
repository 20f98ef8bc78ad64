//! Configuration for normalization and presentation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RinvError};

/// Main configuration for rinv.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RinvConfig {
    /// Row normalization settings.
    pub normalize: NormalizeConfig,

    /// Presentation settings.
    pub format: FormatConfig,
}

/// Settings for the normalization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Description used for line items without one.
    pub empty_description: String,

    /// Scheme prepended to websites that lack one.
    pub url_scheme: String,

    /// Note shown when an empty template is rendered.
    pub note_guidance: String,

    /// Description of the single placeholder item used when a row has no items.
    pub placeholder_item_description: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            empty_description: "—".to_string(),
            url_scheme: "https://".to_string(),
            note_guidance: "(Anything in a Note column goes here)".to_string(),
            placeholder_item_description: "Items[0].Description".to_string(),
        }
    }
}

/// Settings for currency and date formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Symbol placed before amounts.
    pub currency_symbol: String,

    /// chrono `strftime` pattern for dates.
    pub date_format: String,

    /// Text shown for a missing amount.
    pub missing: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: "%B %d, %Y".to_string(),
            missing: "—".to_string(),
        }
    }
}

impl RinvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RinvError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"format": {"currency_symbol": "€"}}"#).unwrap();

        let config = RinvConfig::from_file(&path).unwrap();
        assert_eq!(config.format.currency_symbol, "€");
        assert_eq!(config.format.date_format, "%B %d, %Y");
        assert_eq!(config.normalize, NormalizeConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RinvConfig::default();
        config.normalize.url_scheme = "http://".to_string();
        config.save(&path).unwrap();

        assert_eq!(RinvConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(RinvConfig::from_file(&path), Err(RinvError::Config(_))));
    }
}
