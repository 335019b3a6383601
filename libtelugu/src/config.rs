//! Telugu-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `liblipi_core::Config` (flattened via serde)
//! - Online suggestion options (provider, input tool, request timeout)
//!
//! # Example
//!
//! ```rust
//! use libtelugu::TeluguConfig;
//!
//! let config = TeluguConfig::from_toml_str("cloud_enabled = true\nsuggestion_debounce_ms = 150").unwrap();
//! assert!(config.cloud_enabled);
//! assert_eq!(config.base().suggestion_debounce_ms, 150);
//! ```

use crate::cloud::{CloudProvider, DEFAULT_INPUT_TOOL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TeluguConfig {
    /// Base configuration fields (debounce, cache, select keys, ...)
    #[serde(flatten)]
    pub base: liblipi_core::Config,

    /// Query the online provider for candidates
    pub cloud_enabled: bool,

    /// `google` or the URL of a custom suggestion endpoint
    pub provider: String,

    /// Google Input Tools transliteration id
    pub input_tool: String,

    pub request_timeout_ms: u64,
}

impl Default for TeluguConfig {
    fn default() -> Self {
        Self {
            base: liblipi_core::Config::default(),
            cloud_enabled: false,
            provider: "google".to_string(),
            input_tool: DEFAULT_INPUT_TOOL.to_string(),
            request_timeout_ms: 3000,
        }
    }
}

impl TeluguConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Convert this config into the base config for use with `TypewriterEngine`
    pub fn into_base(self) -> liblipi_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &liblipi_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut liblipi_core::Config {
        &mut self.base
    }

    pub fn cloud_provider(&self) -> CloudProvider {
        CloudProvider::from_setting(&self.provider)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
