//! Transformation id generation.
//!
//! Ids look like `tfm-a3f8b2c1`: a fixed prefix, a dash, and 8 lowercase hex
//! characters from 4 random bytes.

use anyhow::anyhow;

use crate::errors::CoreError;

/// Prefix of every transformation id.
pub const PREFIX_TRANSFORMATION: &str = "tfm";

/// Generate a fresh `tfm-xxxxxxxx` id.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn new_transformation_id() -> Result<String, CoreError> {
    prefixed_id(PREFIX_TRANSFORMATION)
}

fn prefixed_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).map_err(|e| anyhow!("failed to generate id: {e}"))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}
