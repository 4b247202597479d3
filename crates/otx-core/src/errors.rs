//! Cross-cutting error types for otx.
//!
//! This module defines errors that can originate from any crate in the system.
//! Crate-specific errors (`EngineError`, `SessionError`, `ConfigError`) are
//! defined in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any otx crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Transformation parameters failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A section id did not match any known section layout.
    #[error("Invalid section id: '{0}'")]
    InvalidSectionId(String),

    /// An attribute path did not point at an attribute collection entry.
    #[error("Invalid attribute path: '{0}'")]
    InvalidPath(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
