//! The transformation log store.
//!
//! An ordered list of [`Transformation`]s. The log owns each entry's `order`
//! field and keeps it dense (`0..len`) across every insert, remove, and
//! reorder.

use otx_core::section::SectionId;
use otx_core::transformation::Transformation;
use tracing::debug;

use crate::error::SessionError;
use crate::updates::TransformationUpdate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationLog {
    entries: Vec<Transformation>,
}

impl TransformationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Transformation] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transformation> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Transformation> {
        self.entries.iter().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|t| t.id == id)
    }

    /// Append `t` at the end of the log.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateId` if the log already holds `t.id`.
    pub fn add(&mut self, mut t: Transformation) -> Result<(), SessionError> {
        if self.get(&t.id).is_some() {
            return Err(SessionError::DuplicateId(t.id));
        }
        t.order = self.entries.len();
        debug!(transformation_id = %t.id, kind = %t.kind(), order = t.order, "added transformation");
        self.entries.push(t);
        Ok(())
    }

    /// Merge `update` into the entry `id`. An unknown id is a no-op.
    ///
    /// Returns the entry as it was before the update.
    pub fn update(&mut self, id: &str, update: TransformationUpdate) -> Option<Transformation> {
        let Some(t) = self.entries.iter_mut().find(|t| t.id == id) else {
            debug!(transformation_id = id, "update of unknown transformation ignored");
            return None;
        };
        let previous = t.clone();
        update.apply_to(t);
        Some(previous)
    }

    /// Remove the entry `id` and close the gap in `order`.
    pub fn remove(&mut self, id: &str) -> Option<Transformation> {
        let index = self.position(id)?;
        let removed = self.entries.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Move the entry `id` to `destination`, clamped to the log's bounds.
    ///
    /// Returns `false` if the id is unknown.
    pub fn reorder(&mut self, id: &str, destination: usize) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let t = self.entries.remove(index);
        let destination = destination.min(self.entries.len());
        self.entries.insert(destination, t);
        self.reindex();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn reindex(&mut self) {
        for (order, t) in self.entries.iter_mut().enumerate() {
            t.order = order;
        }
    }

    /// Entries scoped to `section`, in log order.
    pub fn by_section<'a>(
        &'a self,
        section: &'a SectionId,
    ) -> impl Iterator<Item = &'a Transformation> + 'a {
        self.entries.iter().filter(move |t| &t.section_id == section)
    }

    /// Number of entries scoped to `section`, whatever their status.
    #[must_use]
    pub fn update_count(&self, section: &SectionId) -> usize {
        self.by_section(section).count()
    }

    /// Whether the entry `id` may be dropped into `section`.
    ///
    /// Additive entries can move to any section; edits of an existing
    /// attribute stay where that attribute lives.
    #[must_use]
    pub fn can_reorder_to(&self, id: &str, section: &SectionId) -> bool {
        self.get(id)
            .is_some_and(|t| t.kind().is_additive() || &t.section_id == section)
    }
}

impl<'a> IntoIterator for &'a TransformationLog {
    type Item = &'a Transformation;
    type IntoIter = std::slice::Iter<'a, Transformation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
