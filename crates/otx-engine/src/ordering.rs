//! The ordering pass.

use otx_core::display::{DisplayAttribute, Tree};
use otx_core::order::AttributeOrderTable;

/// Reorder each section of `tree` by its stored key order.
///
/// Stored keys resolve through the table's rename aliases. Keys are matched
/// as a multiset, so duplicate keys are consumed in derived order. Attributes
/// the stored order does not mention move to the top of the section, ahead of
/// the ordered remainder, keeping their derived order.
pub fn apply_order(tree: &mut Tree, order: &AttributeOrderTable) {
    for section in &mut tree.sections {
        let Some(keys) = order.resolved(&section.id) else {
            continue;
        };
        let derived = std::mem::take(&mut section.attributes);
        section.attributes = arrange(derived, &keys);
    }
}

fn arrange(derived: Vec<DisplayAttribute>, keys: &[String]) -> Vec<DisplayAttribute> {
    let mut pool: Vec<Option<DisplayAttribute>> = derived.into_iter().map(Some).collect();

    let mut ordered = Vec::with_capacity(pool.len());
    for key in keys {
        let slot = pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|a| &a.key == key));
        if let Some(attribute) = slot.and_then(Option::take) {
            ordered.push(attribute);
        }
    }

    let mut arranged: Vec<DisplayAttribute> = pool.into_iter().flatten().collect();
    arranged.extend(ordered);
    arranged
}

#[cfg(test)]
mod tests {
    use super::*;
    use otx_core::display::Section;
    use otx_core::enums::{SectionKind, ValueType};
    use otx_core::section::SectionId;
    use pretty_assertions::assert_eq;

    fn section(keys: &[&str]) -> Tree {
        let id = SectionId::resource(0);
        Tree {
            sections: vec![Section {
                id: id.clone(),
                kind: SectionKind::Resource,
                label: "Resource".into(),
                expanded: true,
                attributes: keys
                    .iter()
                    .enumerate()
                    .map(|(i, k)| DisplayAttribute {
                        id: format!("a{i}"),
                        path: format!("p{i}"),
                        section_id: id.clone(),
                        key: (*k).to_string(),
                        value: String::new(),
                        value_type: ValueType::String,
                        depth: 0,
                        modifications: Vec::new(),
                    })
                    .collect(),
                update_count: 0,
            }],
        }
    }

    fn ids(tree: &Tree) -> Vec<&str> {
        tree.sections[0].attributes.iter().map(|a| a.id.as_str()).collect()
    }

    fn stored(keys: &[&str]) -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unordered_attributes_go_on_top() {
        let mut tree = section(&["new", "a", "b", "c"]);
        let mut table = AttributeOrderTable::new();
        table.set(SectionId::resource(0), stored(&["c", "a", "b"]));
        apply_order(&mut tree, &table);
        assert_eq!(ids(&tree), vec!["a0", "a3", "a1", "a2"]);
    }

    #[test]
    fn duplicates_are_consumed_in_order() {
        let mut tree = section(&["x", "y", "x"]);
        let mut table = AttributeOrderTable::new();
        table.set(SectionId::resource(0), stored(&["x", "y", "x"]));
        apply_order(&mut tree, &table);
        assert_eq!(ids(&tree), vec!["a0", "a1", "a2"]);

        table.set(SectionId::resource(0), stored(&["y", "x"]));
        let mut tree = section(&["x", "y", "x"]);
        apply_order(&mut tree, &table);
        assert_eq!(ids(&tree), vec!["a2", "a1", "a0"]);
    }

    #[test]
    fn stored_keys_resolve_through_renames() {
        let mut tree = section(&["a", "svc"]);
        let mut table = AttributeOrderTable::new();
        let id = SectionId::resource(0);
        table.set(id.clone(), stored(&["service.name", "a"]));
        table.aliases_mut().record(&id, "service.name", "svc");
        apply_order(&mut tree, &table);
        assert_eq!(ids(&tree), vec!["a1", "a0"]);
    }

    #[test]
    fn sections_without_stored_order_are_untouched() {
        let mut tree = section(&["b", "a"]);
        apply_order(&mut tree, &AttributeOrderTable::new());
        assert_eq!(ids(&tree), vec!["a0", "a1"]);
    }
}
