//! Live substring attributes.
//!
//! An `AddSubstring` attribute tracks its source: once the whole log has been
//! applied, every derived value is recomputed from the source's final value.
//! An attribute that a later Mask, Rename or Delete edited is pinned and
//! keeps the value it had when that edit ran.

use otx_core::path::CollectionRef;
use otx_core::record::{AnyValue, ResourceSpan};
use otx_core::text;
use otx_core::transformation::{AddSubstringParams, RangeEnd};
use otx_parser::value_to_string;
use tracing::debug;

#[derive(Debug)]
struct DerivedSubstring {
    transformation_id: String,
    collection: CollectionRef,
    key: String,
    source: Option<CollectionRef>,
    source_key: String,
    start: usize,
    end: RangeEnd,
    pinned: bool,
}

/// A derived attribute whose source could not be found at re-derivation.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct StaleSource {
    pub(crate) transformation_id: String,
    pub(crate) source_key: String,
}

#[derive(Debug, Default)]
pub(crate) struct DerivedSet {
    entries: Vec<DerivedSubstring>,
}

impl DerivedSet {
    pub(crate) fn record(
        &mut self,
        transformation_id: &str,
        collection: CollectionRef,
        source: Option<CollectionRef>,
        params: &AddSubstringParams,
    ) {
        self.entries.push(DerivedSubstring {
            transformation_id: transformation_id.to_string(),
            collection,
            key: params.new_key.clone(),
            source,
            source_key: params.source_key.clone(),
            start: params.substring_start,
            end: params.substring_end,
            pinned: false,
        });
    }

    /// Pin the live derived attribute `key` of `collection`, if any.
    pub(crate) fn pin(&mut self, collection: CollectionRef, key: &str) {
        if let Some(entry) = self.live_mut(collection, key) {
            entry.pinned = true;
        }
    }

    /// Follow a rename of a derived attribute and pin it.
    pub(crate) fn rename(&mut self, collection: CollectionRef, from: &str, to: &str) {
        if let Some(entry) = self.live_mut(collection, from) {
            entry.key = to.to_string();
            entry.pinned = true;
        }
    }

    /// Follow a rename of the attribute live entries are cut from.
    pub(crate) fn rename_source(&mut self, collection: CollectionRef, from: &str, to: &str) {
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| !e.pinned && e.source == Some(collection) && e.source_key == from)
        {
            entry.source_key = to.to_string();
        }
    }

    /// A new attribute `key` was inserted on top of `collection`. Live entries
    /// with the same key can no longer be told apart from it by key, so they
    /// keep the value they have now.
    pub(crate) fn shadow(&mut self, collection: CollectionRef, key: &str) {
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| !e.pinned && e.collection == collection && e.key == key)
        {
            debug!(transformation_id = %entry.transformation_id, key, "substring shadowed by a newer attribute");
            entry.pinned = true;
        }
    }

    fn live_mut(&mut self, collection: CollectionRef, key: &str) -> Option<&mut DerivedSubstring> {
        self.entries
            .iter_mut()
            .find(|e| !e.pinned && e.collection == collection && e.key == key)
    }

    /// Recompute every unpinned derived value from the record's current state.
    ///
    /// A missing source yields an empty value and is reported back.
    pub(crate) fn rederive(&self, record: &mut ResourceSpan) -> Vec<StaleSource> {
        let mut stale = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.pinned) {
            let source_value = entry
                .source
                .and_then(|c| record.attributes(c))
                .and_then(|attrs| attrs.iter().find(|kv| kv.key == entry.source_key))
                .map(|kv| value_to_string(&kv.value));

            let value = match source_value {
                Some(source) => text::substring(&source, entry.start, entry.end),
                None => {
                    stale.push(StaleSource {
                        transformation_id: entry.transformation_id.clone(),
                        source_key: entry.source_key.clone(),
                    });
                    String::new()
                }
            };

            let target = record
                .attributes_mut(entry.collection)
                .and_then(|attrs| attrs.iter_mut().find(|kv| kv.key == entry.key));
            if let Some(kv) = target {
                debug!(
                    transformation_id = %entry.transformation_id,
                    key = %entry.key,
                    "re-derived substring value"
                );
                kv.value = AnyValue::StringValue(value);
            }
        }
        stale
    }
}
