//! Free-form `key = value` input parsing for static additions.

use crate::errors::CoreError;

/// Split free-form input into `(key, value)`.
///
/// Tokens are separated by runs of `=`, `:`, `;`, `,` or whitespace. The first
/// token is the key and the second the value; anything after is ignored. A
/// lone token yields an empty value.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the input contains no token.
pub fn parse_key_value(input: &str) -> Result<(String, String), CoreError> {
    let mut tokens = input
        .split(|c: char| matches!(c, '=' | ':' | ';' | ',') || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let key = tokens
        .next()
        .ok_or_else(|| CoreError::Validation("attribute key cannot be empty".into()))?;
    let value = tokens.next().unwrap_or_default();
    Ok((key.to_string(), value.to_string()))
}
