//! The attribute order table.
//!
//! Per-section key orderings captured from user drag-and-drop, independent of
//! the transformation log. Stored keys are the keys an attribute had when the
//! order was captured; a later rename is resolved at lookup time through
//! [`KeyAliases`] instead of rewriting the stored order.

use std::collections::BTreeMap;

use crate::section::SectionId;

/// Bidirectional rename alias table, scoped per section.
///
/// `forward` maps a key to the key a rename turned it into; `reverse` maps it
/// back. Chains (`a → b → c`) are followed at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAliases {
    forward: BTreeMap<(SectionId, String), String>,
    reverse: BTreeMap<(SectionId, String), String>,
}

impl KeyAliases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` was renamed to `to` within `section`.
    pub fn record(&mut self, section: &SectionId, from: &str, to: &str) {
        self.forward
            .insert((section.clone(), from.to_string()), to.to_string());
        self.reverse
            .insert((section.clone(), to.to_string()), from.to_string());
    }

    /// Drop the alias recorded for `from` within `section`, if any.
    pub fn forget(&mut self, section: &SectionId, from: &str) {
        if let Some(to) = self.forward.remove(&(section.clone(), from.to_string())) {
            let back = (section.clone(), to);
            if self.reverse.get(&back).is_some_and(|f| f == from) {
                self.reverse.remove(&back);
            }
        }
    }

    /// Current key for a stored key.
    #[must_use]
    pub fn resolve(&self, section: &SectionId, key: &str) -> String {
        follow(&self.forward, section, key)
    }

    /// Stored (pre-rename) key for a current key.
    #[must_use]
    pub fn original(&self, section: &SectionId, key: &str) -> String {
        follow(&self.reverse, section, key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

/// Follow a chain of aliases. The walk is bounded by the table size so a
/// rename cycle (`a → b`, `b → a`) terminates.
fn follow(map: &BTreeMap<(SectionId, String), String>, section: &SectionId, key: &str) -> String {
    let mut current = key.to_string();
    for _ in 0..map.len() {
        match map.get(&(section.clone(), current.clone())) {
            Some(next) => current.clone_from(next),
            None => break,
        }
    }
    current
}

/// Section id → ordered attribute keys, plus the rename aliases they resolve through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOrderTable {
    orders: BTreeMap<SectionId, Vec<String>>,
    aliases: KeyAliases,
}

impl AttributeOrderTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys for `section`, as captured.
    #[must_use]
    pub fn get(&self, section: &SectionId) -> Option<&[String]> {
        self.orders.get(section).map(Vec::as_slice)
    }

    /// Stored keys for `section`, each resolved to its current key.
    #[must_use]
    pub fn resolved(&self, section: &SectionId) -> Option<Vec<String>> {
        self.orders.get(section).map(|keys| {
            keys.iter()
                .map(|k| self.aliases.resolve(section, k))
                .collect()
        })
    }

    /// Replace the stored order for `section` verbatim.
    pub fn set(&mut self, section: SectionId, keys: Vec<String>) {
        self.orders.insert(section, keys);
    }

    /// Store an order expressed in current keys, mapping each back to the key
    /// it is stored under so that undoing a rename restores its position.
    pub fn set_resolved(&mut self, section: SectionId, keys: &[String]) {
        let stored = keys
            .iter()
            .map(|k| self.aliases.original(&section, k))
            .collect();
        self.orders.insert(section, stored);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub const fn aliases(&self) -> &KeyAliases {
        &self.aliases
    }

    pub const fn aliases_mut(&mut self) -> &mut KeyAliases {
        &mut self.aliases
    }

    /// Drop every stored order and alias.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.aliases.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_stored_keys_through_renames() {
        let section = SectionId::resource(0);
        let mut table = AttributeOrderTable::new();
        table.set(section.clone(), keys(&["a", "service.name", "b"]));
        table
            .aliases_mut()
            .record(&section, "service.name", "svc");

        assert_eq!(table.get(&section).unwrap(), keys(&["a", "service.name", "b"]));
        assert_eq!(table.resolved(&section).unwrap(), keys(&["a", "svc", "b"]));
    }

    #[test]
    fn aliases_are_scoped_per_section() {
        let resource = SectionId::resource(0);
        let span = SectionId::span_attributes(0, 0, 0);
        let mut aliases = KeyAliases::new();
        aliases.record(&resource, "a", "b");
        assert_eq!(aliases.resolve(&resource, "a"), "b");
        assert_eq!(aliases.resolve(&span, "a"), "a");
    }

    #[test]
    fn chains_and_cycles_terminate() {
        let section = SectionId::resource(0);
        let mut aliases = KeyAliases::new();
        aliases.record(&section, "a", "b");
        aliases.record(&section, "b", "c");
        assert_eq!(aliases.resolve(&section, "a"), "c");
        assert_eq!(aliases.original(&section, "c"), "a");

        aliases.record(&section, "c", "a");
        let _ = aliases.resolve(&section, "a");
    }

    #[test]
    fn set_resolved_stores_original_keys() {
        let section = SectionId::resource(0);
        let mut table = AttributeOrderTable::new();
        table.aliases_mut().record(&section, "old", "new");
        table.set_resolved(section.clone(), &keys(&["x", "new"]));
        assert_eq!(table.get(&section).unwrap(), keys(&["x", "old"]));

        table.aliases_mut().forget(&section, "old");
        assert_eq!(table.resolved(&section).unwrap(), keys(&["x", "old"]));
    }

    #[test]
    fn clear_drops_orders_and_aliases() {
        let section = SectionId::resource(0);
        let mut table = AttributeOrderTable::new();
        table.set(section.clone(), keys(&["a"]));
        table.aliases_mut().record(&section, "a", "b");
        table.clear();
        assert!(table.is_empty());
        assert!(table.aliases().is_empty());
    }
}
