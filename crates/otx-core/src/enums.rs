//! Kind, status, and classification enums for otx.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! except [`SectionKind`], whose string form doubles as the section id prefix.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TransformationKind
// ---------------------------------------------------------------------------

/// The kind of edit a transformation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransformationKind {
    AddStatic,
    AddSubstring,
    Delete,
    Mask,
    RenameKey,
    RawStatement,
}

impl TransformationKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::AddStatic,
        Self::AddSubstring,
        Self::Delete,
        Self::Mask,
        Self::RenameKey,
        Self::RawStatement,
    ];

    /// Whether this kind introduces a new attribute rather than editing one.
    #[must_use]
    pub const fn is_additive(self) -> bool {
        matches!(self, Self::AddStatic | Self::AddSubstring | Self::RawStatement)
    }

    /// Whether this kind edits an existing attribute located by path and key.
    #[must_use]
    pub const fn targets_existing(self) -> bool {
        matches!(self, Self::Delete | Self::Mask | Self::RenameKey)
    }

    /// Short badge text shown next to an attribute carrying this kind.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::AddStatic | Self::AddSubstring => "ADD",
            Self::Delete => "DELETE",
            Self::Mask => "MASK",
            Self::RenameKey => "RENAME KEY",
            Self::RawStatement => "OTTL",
        }
    }

    /// Badge color for this kind.
    #[must_use]
    pub const fn color(self) -> ModificationColor {
        match self {
            Self::AddStatic | Self::AddSubstring | Self::RawStatement => ModificationColor::Green,
            Self::Delete => ModificationColor::Red,
            Self::Mask | Self::RenameKey => ModificationColor::Blue,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddStatic => "add_static",
            Self::AddSubstring => "add_substring",
            Self::Delete => "delete",
            Self::Mask => "mask",
            Self::RenameKey => "rename_key",
            Self::RawStatement => "raw_statement",
        }
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransformationStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a transformation in the log.
///
/// Only `Active` transformations are executed; `Draft` and `Error` entries
/// stay in the log but are skipped by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransformationStatus {
    Draft,
    Active,
    Error,
}

impl TransformationStatus {
    #[must_use]
    pub const fn is_executable(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TransformationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SectionKind
// ---------------------------------------------------------------------------

/// A logical grouping of attributes within the display tree.
///
/// The string form is the prefix of every section id of this kind
/// (`span-attributes-0-0-0`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Resource,
    ScopeInfo,
    SpanInfo,
    SpanAttributes,
    Events,
    Links,
}

impl SectionKind {
    pub const ALL: [Self; 6] = [
        Self::Resource,
        Self::ScopeInfo,
        Self::SpanInfo,
        Self::SpanAttributes,
        Self::Events,
        Self::Links,
    ];

    /// Number of positional indices carried by a section id of this kind.
    ///
    /// ```text
    /// resource-{resource}
    /// scope-info-{resource}-{scope}
    /// span-info|span-attributes|events|links-{resource}-{scope}-{span}
    /// ```
    #[must_use]
    pub const fn index_arity(self) -> usize {
        match self {
            Self::Resource => 1,
            Self::ScopeInfo => 2,
            Self::SpanInfo | Self::SpanAttributes | Self::Events | Self::Links => 3,
        }
    }

    /// Whether this section maps onto an editable attribute collection of the record.
    ///
    /// | Kind | Collection |
    /// |---|---|
    /// | `Resource` | `resource.attributes` |
    /// | `ScopeInfo` | `scopeSpans[n].scope.attributes` |
    /// | `SpanAttributes` | `scopeSpans[n].spans[m].attributes` |
    /// | others | none |
    #[must_use]
    pub const fn has_attribute_collection(self) -> bool {
        matches!(self, Self::Resource | Self::ScopeInfo | Self::SpanAttributes)
    }

    /// Human-readable section title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resource => "Resource",
            Self::ScopeInfo => "Scope Info",
            Self::SpanInfo => "Span Info",
            Self::SpanAttributes => "Span Attributes",
            Self::Events => "Events",
            Self::Links => "Links",
        }
    }

    /// Whether the section starts expanded in the display tree.
    #[must_use]
    pub const fn expanded_by_default(self) -> bool {
        matches!(self, Self::Resource | Self::SpanInfo | Self::SpanAttributes)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::ScopeInfo => "scope-info",
            Self::SpanInfo => "span-info",
            Self::SpanAttributes => "span-attributes",
            Self::Events => "events",
            Self::Links => "links",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValueType
// ---------------------------------------------------------------------------

/// Type classification of a display attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModificationColor
// ---------------------------------------------------------------------------

/// Badge color attached to a modification stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModificationColor {
    Green,
    Red,
    Blue,
}

impl ModificationColor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for ModificationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureIsolation
// ---------------------------------------------------------------------------

/// How the engine contains a transformation that raises an error.
///
/// `Batch` aborts the whole run and reports a single failure; the result falls
/// back to the untransformed record. `PerTransformation` records the failure,
/// skips that one transformation, and keeps applying the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureIsolation {
    #[default]
    Batch,
    PerTransformation,
}

impl FailureIsolation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::PerTransformation => "per_transformation",
        }
    }
}

impl fmt::Display for FailureIsolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
