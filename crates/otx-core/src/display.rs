//! Display tree types.
//!
//! A [`Tree`] is the renderable projection of a record: one [`Section`] per
//! logical attribute group, each holding a flat list of [`DisplayAttribute`]s.
//! Trees are rebuilt from scratch on every derivation and never patched in
//! place. Attribute ids are ephemeral; correlate across derivations with
//! `(section_id, key)` or `path`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ModificationColor, SectionKind, TransformationKind, ValueType};
use crate::section::SectionId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tree {
    pub sections: Vec<Section>,
}

impl Tree {
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub id: SectionId,
    pub kind: SectionKind,
    pub label: String,
    pub expanded: bool,
    pub attributes: Vec<DisplayAttribute>,
    pub update_count: usize,
}

impl Section {
    /// First attribute with `key`, if any.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&DisplayAttribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Attribute keys in display order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.key.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayAttribute {
    pub id: String,
    pub path: String,
    pub section_id: SectionId,
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub depth: u32,
    pub modifications: Vec<AttributeModification>,
}

impl DisplayAttribute {
    /// Whether any stamp on this attribute came from an additive transformation.
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.modifications.iter().any(|m| m.kind.is_additive())
    }
}

/// Metadata stamped onto a display attribute produced or edited by a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeModification {
    pub transformation_id: String,
    pub kind: TransformationKind,
    pub label: String,
    pub color: ModificationColor,
}
