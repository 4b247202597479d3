//! Session error types for otx-session.

use otx_config::ConfigError;
use otx_core::errors::CoreError;
use otx_core::section::SectionId;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A transformation with this id is already in the log.
    #[error("Duplicate transformation id: {0}")]
    DuplicateId(String),

    /// The section is not part of the source tree.
    #[error("Unknown section: {0}")]
    UnknownSection(SectionId),

    /// A drag referenced a position outside the section's visual order.
    #[error("Index {index} out of range for section {section} ({len} attributes)")]
    IndexOutOfRange {
        section: SectionId,
        index: usize,
        len: usize,
    },

    /// The dragged attribute already carries a pending Delete.
    #[error("Attribute '{key}' in {section} has a pending delete and cannot move")]
    PendingDelete { section: SectionId, key: String },

    /// The section has no attribute collection to receive or give up attributes.
    #[error("Section {0} does not hold editable attributes")]
    NotEditable(SectionId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
