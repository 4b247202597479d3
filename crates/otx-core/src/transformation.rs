//! The transformation data model.
//!
//! A [`Transformation`] is one durable, user-authored edit intent scoped to a
//! section. Its kind-specific [`TransformationParams`] are built through
//! validating constructors so that a malformed edit (empty key, empty range)
//! is rejected before it can enter the log.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::{TransformationKind, TransformationStatus};
use crate::errors::CoreError;
use crate::ids;
use crate::input::parse_key_value;
use crate::section::SectionId;

// ---------------------------------------------------------------------------
// RangeEnd
// ---------------------------------------------------------------------------

/// Exclusive end of a character range: a fixed offset or the end of the value.
///
/// Serialized as a number or the string `"end"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEnd {
    At(usize),
    End,
}

impl RangeEnd {
    /// Concrete offset for a value of `len` characters.
    #[must_use]
    pub const fn resolve(self, len: usize) -> usize {
        match self {
            Self::At(end) => end,
            Self::End => len,
        }
    }
}

impl fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(end) => write!(f, "{end}"),
            Self::End => f.write_str("end"),
        }
    }
}

impl Serialize for RangeEnd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(end) => serializer.serialize_u64(*end as u64),
            Self::End => serializer.serialize_str("end"),
        }
    }
}

impl<'de> Deserialize<'de> for RangeEnd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RangeEndVisitor;

        impl Visitor<'_> for RangeEndVisitor {
            type Value = RangeEnd;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative offset or \"end\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RangeEnd, E> {
                usize::try_from(v)
                    .map(RangeEnd::At)
                    .map_err(|_| E::custom("offset out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RangeEnd, E> {
                usize::try_from(v)
                    .map(RangeEnd::At)
                    .map_err(|_| E::custom("offset must be non-negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RangeEnd, E> {
                if v == "end" {
                    Ok(RangeEnd::End)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(RangeEndVisitor)
    }
}

impl JsonSchema for RangeEnd {
    fn schema_name() -> Cow<'static, str> {
        "RangeEnd".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "oneOf": [
                { "type": "integer", "minimum": 0 },
                { "const": "end" }
            ]
        })
    }
}

/// Reject an empty or reversed `[start, end)` range.
fn check_range(field: &str, start: usize, end: RangeEnd) -> Result<(), CoreError> {
    match end {
        RangeEnd::At(end) if end <= start => Err(CoreError::Validation(format!(
            "{field} range [{start}, {end}) is empty"
        ))),
        _ => Ok(()),
    }
}

fn require(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Introduce a new attribute with a literal string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AddStaticParams {
    pub key: String,
    pub value: String,
    pub insertion_section_id: SectionId,
}

impl AddStaticParams {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `key` is blank.
    pub fn new(
        key: &str,
        value: impl Into<String>,
        insertion_section_id: SectionId,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            key: require("key", key)?,
            value: value.into(),
            insertion_section_id,
        })
    }

    /// Build from free-form `key = value` input (see [`parse_key_value`]).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the input holds no key.
    pub fn from_input(input: &str, insertion_section_id: SectionId) -> Result<Self, CoreError> {
        let (key, value) = parse_key_value(input)?;
        Self::new(&key, value, insertion_section_id)
    }
}

/// Introduce a new attribute whose value is a live substring of another
/// attribute's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AddSubstringParams {
    pub source_attribute_path: String,
    pub source_key: String,
    pub new_key: String,
    pub substring_start: usize,
    pub substring_end: RangeEnd,
    pub insertion_section_id: SectionId,
}

impl AddSubstringParams {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if either key is blank or the range is empty.
    pub fn new(
        source_attribute_path: impl Into<String>,
        source_key: &str,
        new_key: &str,
        substring_start: usize,
        substring_end: RangeEnd,
        insertion_section_id: SectionId,
    ) -> Result<Self, CoreError> {
        check_range("substring", substring_start, substring_end)?;
        Ok(Self {
            source_attribute_path: source_attribute_path.into(),
            source_key: require("source key", source_key)?,
            new_key: require("new key", new_key)?,
            substring_start,
            substring_end,
            insertion_section_id,
        })
    }
}

/// Remove an existing attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteParams {
    pub attribute_path: String,
    pub attribute_key: String,
}

impl DeleteParams {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the key is blank.
    pub fn new(attribute_path: impl Into<String>, attribute_key: &str) -> Result<Self, CoreError> {
        Ok(Self {
            attribute_path: attribute_path.into(),
            attribute_key: require("attribute key", attribute_key)?,
        })
    }
}

/// Replace a character range of an existing attribute's value with a fixed-width mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaskParams {
    pub attribute_path: String,
    pub attribute_key: String,
    pub mask_start: usize,
    pub mask_end: RangeEnd,
    pub mask_char: char,
}

impl MaskParams {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the key is blank, the range is empty,
    /// or `mask_char` is whitespace.
    pub fn new(
        attribute_path: impl Into<String>,
        attribute_key: &str,
        mask_start: usize,
        mask_end: RangeEnd,
        mask_char: char,
    ) -> Result<Self, CoreError> {
        check_range("mask", mask_start, mask_end)?;
        if mask_char.is_whitespace() {
            return Err(CoreError::Validation(
                "mask character cannot be whitespace".into(),
            ));
        }
        Ok(Self {
            attribute_path: attribute_path.into(),
            attribute_key: require("attribute key", attribute_key)?,
            mask_start,
            mask_end,
            mask_char,
        })
    }
}

/// Rename an existing attribute's key in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenameKeyParams {
    pub attribute_path: String,
    pub old_key: String,
    pub new_key: String,
}

impl RenameKeyParams {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the new key is blank or equal to the old key.
    pub fn new(
        attribute_path: impl Into<String>,
        old_key: &str,
        new_key: &str,
    ) -> Result<Self, CoreError> {
        let old_key = require("old key", old_key)?;
        let new_key = require("new key", new_key)?;
        if new_key == old_key {
            return Err(CoreError::Validation(format!(
                "rename of '{old_key}' does not change the key"
            )));
        }
        Ok(Self {
            attribute_path: attribute_path.into(),
            old_key,
            new_key,
        })
    }
}

/// Opaque statement stored and displayed verbatim; never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawStatementParams {
    pub statement: String,
    pub insertion_section_id: SectionId,
}

impl RawStatementParams {
    /// Key under which raw statements are displayed.
    pub const DISPLAY_KEY: &'static str = "OTTL";

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the statement is blank.
    pub fn new(statement: &str, insertion_section_id: SectionId) -> Result<Self, CoreError> {
        Ok(Self {
            statement: require("statement", statement)?,
            insertion_section_id,
        })
    }
}

/// Kind-specific parameters, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformationParams {
    AddStatic(AddStaticParams),
    AddSubstring(AddSubstringParams),
    Delete(DeleteParams),
    Mask(MaskParams),
    RenameKey(RenameKeyParams),
    RawStatement(RawStatementParams),
}

impl TransformationParams {
    #[must_use]
    pub const fn kind(&self) -> TransformationKind {
        match self {
            Self::AddStatic(_) => TransformationKind::AddStatic,
            Self::AddSubstring(_) => TransformationKind::AddSubstring,
            Self::Delete(_) => TransformationKind::Delete,
            Self::Mask(_) => TransformationKind::Mask,
            Self::RenameKey(_) => TransformationKind::RenameKey,
            Self::RawStatement(_) => TransformationKind::RawStatement,
        }
    }

    /// `(path, key)` of the existing attribute a Delete/Mask/Rename edits.
    #[must_use]
    pub fn target(&self) -> Option<(&str, &str)> {
        match self {
            Self::Delete(p) => Some((&p.attribute_path, &p.attribute_key)),
            Self::Mask(p) => Some((&p.attribute_path, &p.attribute_key)),
            Self::RenameKey(p) => Some((&p.attribute_path, &p.old_key)),
            Self::AddStatic(_) | Self::AddSubstring(_) | Self::RawStatement(_) => None,
        }
    }

    /// Section the new attribute is inserted into, for additive kinds.
    #[must_use]
    pub const fn insertion_section(&self) -> Option<&SectionId> {
        match self {
            Self::AddStatic(p) => Some(&p.insertion_section_id),
            Self::AddSubstring(p) => Some(&p.insertion_section_id),
            Self::RawStatement(p) => Some(&p.insertion_section_id),
            Self::Delete(_) | Self::Mask(_) | Self::RenameKey(_) => None,
        }
    }

    /// Point an additive transformation at another section.
    pub fn set_insertion_section(&mut self, section: SectionId) {
        match self {
            Self::AddStatic(p) => p.insertion_section_id = section,
            Self::AddSubstring(p) => p.insertion_section_id = section,
            Self::RawStatement(p) => p.insertion_section_id = section,
            Self::Delete(_) | Self::Mask(_) | Self::RenameKey(_) => {}
        }
    }

    /// One-line summary shown in the pending-edit list.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::AddStatic(p) => format!("{} = {}", p.key, p.value),
            Self::AddSubstring(p) => format!(
                "{} = {}[{}..{}]",
                p.new_key, p.source_key, p.substring_start, p.substring_end
            ),
            Self::Delete(p) => format!("Delete {}", p.attribute_key),
            Self::Mask(p) => format!(
                "Mask {} [{}..{}]",
                p.attribute_key, p.mask_start, p.mask_end
            ),
            Self::RenameKey(p) => format!("{} \u{2192} {}", p.old_key, p.new_key),
            Self::RawStatement(p) => p.statement.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transformation
// ---------------------------------------------------------------------------

/// One entry of the transformation log.
///
/// `order` is owned by the log and reassigned densely on every insert, remove,
/// and reorder. `id` is stable for the transformation's lifetime and is the
/// join key between displayed attributes and the edit that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transformation {
    pub id: String,
    pub order: usize,
    pub section_id: SectionId,
    pub created_at: DateTime<Utc>,
    pub status: TransformationStatus,
    pub params: TransformationParams,
}

impl Transformation {
    /// Create an active transformation with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if no id can be generated.
    pub fn new(section_id: SectionId, params: TransformationParams) -> Result<Self, CoreError> {
        Ok(Self::with_id(ids::new_transformation_id()?, section_id, params))
    }

    /// Create an active transformation with a caller-chosen id.
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        section_id: SectionId,
        params: TransformationParams,
    ) -> Self {
        Self {
            id: id.into(),
            order: 0,
            section_id,
            created_at: Utc::now(),
            status: TransformationStatus::Active,
            params,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TransformationKind {
        self.params.kind()
    }

    /// Whether this Delete/Mask/Rename edits the attribute at `(path, key)`.
    #[must_use]
    pub fn targets(&self, path: &str, key: &str) -> bool {
        self.params
            .target()
            .is_some_and(|(p, k)| p == path && k == key)
    }
}
