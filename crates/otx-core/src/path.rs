//! Structural attribute paths.
//!
//! Every display attribute carries a path naming its location in the record,
//! e.g. `resourceSpans[0].scopeSpans[0].spans[0].attributes[18]`. Paths into an
//! attribute collection parse into an [`AttributeLocation`]; paths of span
//! fields, events, links, or newly added attributes do not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::section::SectionId;

/// One editable attribute collection of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "snake_case")]
pub enum CollectionRef {
    Resource {
        resource: usize,
    },
    Scope {
        resource: usize,
        scope: usize,
    },
    Span {
        resource: usize,
        scope: usize,
        span: usize,
    },
}

impl CollectionRef {
    /// Path of the collection itself, without an element index.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        match *self {
            Self::Resource { resource } => format!("resourceSpans[{resource}].resource.attributes"),
            Self::Scope { resource, scope } => {
                format!("resourceSpans[{resource}].scopeSpans[{scope}].scope.attributes")
            }
            Self::Span {
                resource,
                scope,
                span,
            } => format!("resourceSpans[{resource}].scopeSpans[{scope}].spans[{span}].attributes"),
        }
    }

    /// Path of the attribute at `index` within this collection.
    #[must_use]
    pub fn attribute_path(&self, index: usize) -> String {
        format!("{}[{index}]", self.path_prefix())
    }

    /// The display section that renders this collection.
    #[must_use]
    pub const fn section_id(&self) -> SectionId {
        match *self {
            Self::Resource { resource } => SectionId::resource(resource),
            Self::Scope { resource, scope } => SectionId::scope_info(resource, scope),
            Self::Span {
                resource,
                scope,
                span,
            } => SectionId::span_attributes(resource, scope, span),
        }
    }
}

/// A parsed attribute path: which collection, and the index within it at the
/// time the path was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation {
    pub collection: CollectionRef,
    pub index: usize,
}

impl AttributeLocation {
    /// Parse a path, returning `None` for paths that do not address an
    /// attribute collection entry.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments = path
            .split('.')
            .map(segment)
            .collect::<Option<Vec<_>>>()?;

        let (collection, index) = match segments.as_slice() {
            [
                ("resourceSpans", Some(resource)),
                ("resource", None),
                ("attributes", Some(index)),
            ] => (
                CollectionRef::Resource {
                    resource: *resource,
                },
                *index,
            ),
            [
                ("resourceSpans", Some(resource)),
                ("scopeSpans", Some(scope)),
                ("scope", None),
                ("attributes", Some(index)),
            ] => (
                CollectionRef::Scope {
                    resource: *resource,
                    scope: *scope,
                },
                *index,
            ),
            [
                ("resourceSpans", Some(resource)),
                ("scopeSpans", Some(scope)),
                ("spans", Some(span)),
                ("attributes", Some(index)),
            ] => (
                CollectionRef::Span {
                    resource: *resource,
                    scope: *scope,
                    span: *span,
                },
                *index,
            ),
            _ => return None,
        };

        Some(Self { collection, index })
    }
}

impl FromStr for AttributeLocation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidPath(s.to_string()))
    }
}

impl fmt::Display for AttributeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection.attribute_path(self.index))
    }
}

/// Split `name[3]` into `("name", Some(3))` and `name` into `("name", None)`.
fn segment(raw: &str) -> Option<(&str, Option<usize>)> {
    match raw.split_once('[') {
        None => Some((raw, None)),
        Some((name, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some((name, Some(index)))
        }
    }
}
