//! Drag-and-drop of attributes.
//!
//! A drag within a section only rewrites that section's stored order. A drag
//! into another section also edits the log so that executing it lands the
//! attribute where it was dropped.

use otx_core::enums::TransformationKind;
use otx_core::path::AttributeLocation;
use otx_core::section::SectionId;
use otx_core::text;
use otx_core::transformation::{
    AddStaticParams, DeleteParams, Transformation, TransformationParams,
};
use otx_engine::TransformationEngine;
use tracing::debug;

use crate::error::SessionError;
use crate::natural::{NaturalEntry, Origin};
use crate::session::TransformSession;
use crate::updates::TransformationUpdateBuilder;

impl TransformSession {
    /// Move the attribute at visual position `from` of `section` to `to`.
    ///
    /// `to` is clamped to the section's length. Returns the new order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSection` or `SessionError::IndexOutOfRange`.
    pub fn move_within(
        &mut self,
        section: &SectionId,
        from: usize,
        to: usize,
    ) -> Result<Vec<String>, SessionError> {
        let mut order = self.visual_order(section)?;
        if from >= order.len() {
            return Err(out_of_range(section, from, order.len()));
        }
        let key = order.remove(from);
        order.insert(to.min(order.len()), key);
        self.set_order(section.clone(), &order);
        Ok(order)
    }

    /// Move the attribute at visual position `from` of `from_section` to
    /// position `to` of `to_section`.
    ///
    /// An attribute an additive transformation introduced is moved by
    /// retargeting that transformation. Any other attribute is deleted from
    /// its section and re-added, with its current key and value, in the
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PendingDelete` if the attribute is already
    /// being deleted, `SessionError::NotEditable` if either section holds no
    /// attributes or the dragged row is not one of its attributes (a scope
    /// header row), and `SessionError::UnknownSection` or
    /// `SessionError::IndexOutOfRange` for a bad drag.
    pub fn move_across(
        &mut self,
        from_section: &SectionId,
        from: usize,
        to_section: &SectionId,
        to: usize,
    ) -> Result<(), SessionError> {
        if from_section == to_section {
            return self.move_within(from_section, from, to).map(|_| ());
        }
        for section in [from_section, to_section] {
            if section.collection().is_none() {
                return Err(SessionError::NotEditable(section.clone()));
            }
        }

        let mut from_order = self.visual_order(from_section)?;
        let mut to_order = self.visual_order(to_section)?;
        if from >= from_order.len() {
            return Err(out_of_range(from_section, from, from_order.len()));
        }
        let entry = self.entry_at(from_section, &from_order, from)?;

        if let Origin::Source { path, .. } = &entry.origin {
            let in_collection = AttributeLocation::parse(path)
                .is_some_and(|loc| Some(loc.collection) == from_section.collection());
            if !in_collection {
                return Err(SessionError::NotEditable(from_section.clone()));
            }
        }

        if self.has_pending_delete(from_section, &entry) {
            return Err(SessionError::PendingDelete {
                section: from_section.clone(),
                key: entry.key,
            });
        }

        match &entry.origin {
            Origin::Added {
                transformation_id, ..
            } => self.retarget(transformation_id, to_section),
            Origin::Source { path, value, .. } => {
                let value = self.current_value(from_section, path, &entry.key, value);
                self.relocate(from_section, path, &entry.key, value, to_section)?;
            }
        }

        from_order.remove(from);
        to_order.insert(to.min(to_order.len()), entry.key.clone());
        self.set_order(from_section.clone(), &from_order);
        self.set_order(to_section.clone(), &to_order);

        debug!(
            key = %entry.key,
            from = %from_section,
            to = %to_section,
            "moved attribute across sections"
        );
        Ok(())
    }

    /// The natural entry shown at `index` of `order`. Equal keys are paired
    /// up by occurrence.
    fn entry_at(
        &self,
        section: &SectionId,
        order: &[String],
        index: usize,
    ) -> Result<NaturalEntry, SessionError> {
        let key = &order[index];
        let occurrence = order[..index].iter().filter(|k| *k == key).count();
        self.natural(section)?
            .into_iter()
            .filter(|e| &e.key == key)
            .nth(occurrence)
            .ok_or_else(|| anyhow::anyhow!("no attribute '{key}' in {section}").into())
    }

    fn has_pending_delete(&self, section: &SectionId, entry: &NaturalEntry) -> bool {
        self.log
            .by_section(section)
            .filter(|t| t.kind() == TransformationKind::Delete)
            .any(|t| match &entry.origin {
                Origin::Source { path, .. } => t.targets(path, &entry.key),
                Origin::Added { .. } => t.params.target().is_some_and(|(_, key)| key == entry.key),
            })
    }

    fn retarget(&mut self, id: &str, section: &SectionId) {
        let Some(t) = self.log.get(id) else {
            return;
        };
        let mut params = t.params.clone();
        params.set_insertion_section(section.clone());
        self.update(
            id,
            TransformationUpdateBuilder::new()
                .section_id(section.clone())
                .params(params)
                .build(),
        );
    }

    /// Value the attribute will have once the log runs, for an attribute a
    /// Mask or Rename edits; the source value otherwise.
    fn current_value(&self, section: &SectionId, path: &str, key: &str, source: &str) -> String {
        let edited = self.log.by_section(section).any(|t| {
            matches!(t.kind(), TransformationKind::Mask | TransformationKind::RenameKey)
                && t.params.target().is_some_and(|(p, _)| p == path)
        });
        if !edited {
            return text::unquote(source).to_string();
        }

        let result = TransformationEngine::execute(
            &self.record,
            self.log.as_slice(),
            &self.order,
            self.options(),
        );
        result
            .transformed_tree
            .section(section)
            .and_then(|s| s.attribute(key))
            .map_or_else(
                || text::unquote(source).to_string(),
                |a| text::unquote(&a.value).to_string(),
            )
    }

    fn relocate(
        &mut self,
        from_section: &SectionId,
        path: &str,
        key: &str,
        value: String,
        to_section: &SectionId,
    ) -> Result<(), SessionError> {
        let delete = Transformation::new(
            from_section.clone(),
            TransformationParams::Delete(DeleteParams::new(path, key)?),
        )?;
        let add = Transformation::new(
            to_section.clone(),
            TransformationParams::AddStatic(AddStaticParams::new(key, value, to_section.clone())?),
        )?;
        self.moved_out.insert(delete.id.clone());
        self.add(delete)?;
        self.add(add)?;
        Ok(())
    }
}

fn out_of_range(section: &SectionId, index: usize, len: usize) -> SessionError {
    SessionError::IndexOutOfRange {
        section: section.clone(),
        index,
        len,
    }
}
