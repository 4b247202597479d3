//! Value arithmetic shared by the engine and the session.
//!
//! All offsets are character offsets into the *unquoted* value. Out-of-range
//! offsets are clamped and a reversed range is swapped, so no input can panic.

use crate::transformation::RangeEnd;

/// Width of the mask token. The token is fixed-width regardless of how many
/// characters it replaces.
pub const MASK_WIDTH: usize = 5;

/// Default mask character.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Strip one pair of surrounding double quotes, if present.
#[must_use]
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Characters `[start, end)` of `value`, clamped to its length, with a
/// reversed range swapped.
#[must_use]
pub fn substring(value: &str, start: usize, end: RangeEnd) -> String {
    let chars: Vec<char> = unquote(value).chars().collect();
    let len = chars.len();
    let mut from = start.min(len);
    let mut to = end.resolve(len).min(len);
    if from > to {
        std::mem::swap(&mut from, &mut to);
    }
    chars[from..to].iter().collect()
}

/// Replace characters `[start, end)` of `value` with [`MASK_WIDTH`] copies of
/// `mask_char`.
///
/// `mask("secret123", 0, 6)` is `"*****123"`; `mask("secret123", 0, 4)` is
/// `"*****et123"`.
#[must_use]
pub fn mask(value: &str, start: usize, end: RangeEnd, mask_char: char) -> String {
    let chars: Vec<char> = unquote(value).chars().collect();
    let len = chars.len();
    let mut before = start.min(len);
    let mut after = end.resolve(len).min(len);
    if before > after {
        std::mem::swap(&mut before, &mut after);
    }

    let mut out = String::with_capacity(len + MASK_WIDTH);
    out.extend(&chars[..before]);
    out.extend(std::iter::repeat_n(mask_char, MASK_WIDTH));
    out.extend(&chars[after..]);
    out
}

/// Stamp label for a mask over `[start, end)` of `value`.
#[must_use]
pub fn mask_label(value: &str, start: usize, end: RangeEnd) -> String {
    let len = unquote(value).chars().count();
    let entire = start == 0 && (end == RangeEnd::End || end == RangeEnd::At(len));
    if entire {
        "MASK [Entire str]".to_string()
    } else {
        format!("MASK [{start}\u{2013}{end}]")
    }
}
