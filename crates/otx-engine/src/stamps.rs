//! Modification stamps keyed by `(section, resulting key)`.

use std::collections::BTreeMap;

use otx_core::display::{AttributeModification, Tree};
use otx_core::section::SectionId;
use otx_core::transformation::Transformation;

#[derive(Debug, Default)]
pub(crate) struct StampTable {
    stamps: BTreeMap<(SectionId, String), Vec<AttributeModification>>,
}

impl StampTable {
    /// Stamp `key` in `section` with the badge of `transformation`.
    pub(crate) fn push(
        &mut self,
        section: &SectionId,
        key: &str,
        transformation: &Transformation,
        label: String,
    ) {
        let kind = transformation.kind();
        self.stamps
            .entry((section.clone(), key.to_string()))
            .or_default()
            .push(AttributeModification {
                transformation_id: transformation.id.clone(),
                kind,
                label,
                color: kind.color(),
            });
    }

    /// Carry the stamps of `from` over to `to`.
    pub(crate) fn rename(&mut self, section: &SectionId, from: &str, to: &str) {
        if let Some(moved) = self.stamps.remove(&(section.clone(), from.to_string())) {
            self.stamps
                .entry((section.clone(), to.to_string()))
                .or_default()
                .extend(moved);
        }
    }

    pub(crate) fn clear(&mut self, section: &SectionId, key: &str) {
        self.stamps.remove(&(section.clone(), key.to_string()));
    }

    /// Copy stamps onto every matching attribute of a freshly derived tree.
    pub(crate) fn apply_to(&self, tree: &mut Tree) {
        for section in &mut tree.sections {
            for attribute in &mut section.attributes {
                if let Some(stamps) = self.stamps.get(&(section.id.clone(), attribute.key.clone())) {
                    attribute.modifications.extend(stamps.iter().cloned());
                }
            }
        }
    }
}
