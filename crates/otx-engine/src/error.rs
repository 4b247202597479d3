//! Engine error types for otx-engine.

use otx_core::errors::CoreError;
use otx_core::section::SectionId;
use thiserror::Error;

/// Errors raised while applying a single transformation.
///
/// These never escape [`TransformationEngine::execute`]; they are reported as
/// failures of the run.
///
/// [`TransformationEngine::execute`]: crate::TransformationEngine::execute
#[derive(Debug, Error)]
pub enum EngineError {
    /// The section kind has no attribute collection in the record.
    #[error("Section {section} has no editable attribute collection")]
    NoAttributeCollection { section: SectionId },

    /// The section refers to a scope or span the record does not have.
    #[error("Section {section} refers to a scope or span missing from the record")]
    MissingCollection { section: SectionId },

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
