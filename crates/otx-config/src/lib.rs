//! # otx-config
//!
//! Layered configuration loading for otx using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`OTX_*` prefix, `__` as separator)
//! 2. Project-level `.otx/config.toml`
//! 3. User-level `~/.config/otx/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `OTX_ENGINE__ISOLATION` -> `engine.isolation`,
//! `OTX_GENERAL__DEFAULT_MASK_CHAR` -> `general.default_mask_char`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use otx_config::OtxConfig;
//!
//! let config = OtxConfig::load().expect("config");
//! println!("isolation: {}", config.engine.isolation);
//! ```

mod engine;
mod error;
mod general;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OtxConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl OtxConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate a configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.general.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".otx/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("OTX_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("otx").join("config.toml"))
    }
}
