//! Structured section identifiers.
//!
//! A section id names one logical group of attributes in the display tree and
//! the positional indices of the record element it was derived from. Its
//! string form (`span-attributes-0-0-0`) is what transformations and the
//! attribute order table carry; parsing goes through the [`SectionKind`]
//! prefix table rather than substring tests.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::SectionKind;
use crate::errors::CoreError;
use crate::path::CollectionRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId {
    kind: SectionKind,
    resource: usize,
    scope: Option<usize>,
    span: Option<usize>,
}

impl SectionId {
    #[must_use]
    pub const fn resource(resource: usize) -> Self {
        Self {
            kind: SectionKind::Resource,
            resource,
            scope: None,
            span: None,
        }
    }

    #[must_use]
    pub const fn scope_info(resource: usize, scope: usize) -> Self {
        Self {
            kind: SectionKind::ScopeInfo,
            resource,
            scope: Some(scope),
            span: None,
        }
    }

    /// Build a span-level section id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSectionId` if `kind` is not a span-level kind.
    pub fn span_level(
        kind: SectionKind,
        resource: usize,
        scope: usize,
        span: usize,
    ) -> Result<Self, CoreError> {
        if kind.index_arity() != 3 {
            return Err(CoreError::InvalidSectionId(format!(
                "{kind} is not a span-level section"
            )));
        }
        Ok(Self::span(kind, resource, scope, span))
    }

    #[must_use]
    pub const fn span_attributes(resource: usize, scope: usize, span: usize) -> Self {
        Self::span(SectionKind::SpanAttributes, resource, scope, span)
    }

    #[must_use]
    pub const fn span_info(resource: usize, scope: usize, span: usize) -> Self {
        Self::span(SectionKind::SpanInfo, resource, scope, span)
    }

    #[must_use]
    pub const fn events(resource: usize, scope: usize, span: usize) -> Self {
        Self::span(SectionKind::Events, resource, scope, span)
    }

    #[must_use]
    pub const fn links(resource: usize, scope: usize, span: usize) -> Self {
        Self::span(SectionKind::Links, resource, scope, span)
    }

    const fn span(kind: SectionKind, resource: usize, scope: usize, span: usize) -> Self {
        Self {
            kind,
            resource,
            scope: Some(scope),
            span: Some(span),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        self.kind
    }

    /// The record attribute collection this section edits, if any.
    #[must_use]
    pub const fn collection(&self) -> Option<CollectionRef> {
        match (self.kind, self.scope, self.span) {
            (SectionKind::Resource, _, _) => Some(CollectionRef::Resource {
                resource: self.resource,
            }),
            (SectionKind::ScopeInfo, Some(scope), _) => Some(CollectionRef::Scope {
                resource: self.resource,
                scope,
            }),
            (SectionKind::SpanAttributes, Some(scope), Some(span)) => Some(CollectionRef::Span {
                resource: self.resource,
                scope,
                span,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.resource)?;
        if let Some(scope) = self.scope {
            write!(f, "-{scope}")?;
        }
        if let Some(span) = self.span {
            write!(f, "-{span}")?;
        }
        Ok(())
    }
}

impl FromStr for SectionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidSectionId(s.to_string());

        let (kind, rest) = SectionKind::ALL
            .into_iter()
            .find_map(|kind| {
                s.strip_prefix(kind.as_str())
                    .and_then(|rest| rest.strip_prefix('-'))
                    .map(|rest| (kind, rest))
            })
            .ok_or_else(invalid)?;

        let indices = rest
            .split('-')
            .map(str::parse::<usize>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        if indices.len() != kind.index_arity() {
            return Err(invalid());
        }

        Ok(Self {
            kind,
            resource: indices[0],
            scope: indices.get(1).copied(),
            span: indices.get(2).copied(),
        })
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for SectionId {
    fn schema_name() -> Cow<'static, str> {
        "SectionId".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^(resource-\\d+|scope-info-\\d+-\\d+|(span-info|span-attributes|events|links)-\\d+-\\d+-\\d+)$"
        })
    }
}
