//! Mushaf reader configuration
//!
//! Settings live in a single TOML file split into sections. Each section is
//! a type implementing [`ConfigSection`], so it validates and merges itself.
//!
//! - Missing files load as defaults
//! - Invalid values in a loaded file are warnings, not errors
//! - Saving validates first and writes atomically
//!
//! # Example
//!
//! ```rust,no_run
//! use mushaf_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! println!("Opening page {}", config.reader.start_page);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
mod asset_config;
mod gesture_config;
mod reader_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{apply_env_overrides, ConfigManager, ENV_PREFIX};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, ColorScheme, LogLevel};
pub use asset_config::AssetConfig;
pub use gesture_config::GestureConfig;
pub use reader_config::ReaderConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    pub app: AppConfig,

    /// Page view and zoom
    pub reader: ReaderConfig,

    /// Swipe thresholds
    pub gestures: GestureConfig,

    /// Asset locations
    pub assets: AssetConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.reader.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.gestures.validate() {
            errors.append(&mut e);
        }
        if let Err(mut e) = self.assets.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Renders the config as it would be written to disk
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Overlays `other` section by section; its values win
    ///
    /// The CLI does not go through here. It applies the file, then the
    /// `MUSHAF_*` variables, then its flags directly.
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.reader.merge(other.reader);
        self.gestures.merge(other.gestures);
        self.assets.merge(other.assets);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            reader: ReaderConfig::default(),
            gestures: GestureConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}
