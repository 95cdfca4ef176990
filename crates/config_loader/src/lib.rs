//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `PasteConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("linepacer.toml")).unwrap();
//! println!("default delay: {}ms", config.paste.default_delay_ms);
//! ```

mod parser;
mod validator;

pub use contracts::PasteConfig;
pub use parser::ConfigFormat;

use contracts::PasteError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PasteConfig, PasteError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<PasteConfig, PasteError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already-built configuration (e.g. after CLI overrides)
    pub fn validate(config: &PasteConfig) -> Result<(), PasteError> {
        validator::validate(config)
    }

    /// Serialize PasteConfig to TOML string
    pub fn to_toml(config: &PasteConfig) -> Result<String, PasteError> {
        toml::to_string_pretty(config)
            .map_err(|e| PasteError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize PasteConfig to JSON string
    pub fn to_json(config: &PasteConfig) -> Result<String, PasteError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| PasteError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, PasteError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            PasteError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| PasteError::config_parse(format!("unsupported config format: .{ext}")))
    }

    fn read_file(path: &Path) -> Result<String, PasteError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<PasteConfig, PasteError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
