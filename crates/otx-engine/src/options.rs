//! Per-run engine options.

use otx_core::enums::FailureIsolation;

/// Knobs for one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub isolation: FailureIsolation,
    /// Record a warning when a Delete/Mask/Rename target no longer exists.
    pub warn_on_missing_target: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            isolation: FailureIsolation::Batch,
            warn_on_missing_target: true,
        }
    }
}

impl ExecuteOptions {
    #[must_use]
    pub const fn with_isolation(mut self, isolation: FailureIsolation) -> Self {
        self.isolation = isolation;
        self
    }

    #[must_use]
    pub const fn with_missing_target_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_missing_target = enabled;
        self
    }
}
