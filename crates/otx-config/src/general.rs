//! General configuration.

use otx_core::text::DEFAULT_MASK_CHAR;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Character used when a mask is created from a text selection.
    #[serde(default = "default_mask_char")]
    pub default_mask_char: char,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_mask_char: default_mask_char(),
        }
    }
}

impl GeneralConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the mask character is whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_mask_char.is_whitespace() {
            return Err(ConfigError::InvalidValue {
                field: "general.default_mask_char".into(),
                reason: "mask character cannot be whitespace".into(),
            });
        }
        Ok(())
    }
}
