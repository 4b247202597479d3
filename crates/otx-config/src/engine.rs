//! Engine configuration.

use otx_core::enums::FailureIsolation;
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// How a failing transformation is contained (`batch` or `per_transformation`).
    #[serde(default)]
    pub isolation: FailureIsolation,

    /// Whether a Delete/Mask/Rename whose target is gone is reported as a warning.
    #[serde(default = "default_true")]
    pub warn_on_missing_target: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            isolation: FailureIsolation::default(),
            warn_on_missing_target: true,
        }
    }
}
