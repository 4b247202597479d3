//! Per-section order lifecycle.

use otx_core::order::AttributeOrderTable;
use otx_core::section::SectionId;
use tracing::debug;

use crate::natural::NaturalEntry;
use crate::reconcile::reconcile;

/// Where a section is in its ordering lifecycle.
///
/// A section is seeded from its natural order the first time it is
/// observed and is reconciled on every observation after that. It does not
/// go back to `Uninitialized`; only clearing the session does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderState {
    #[default]
    Uninitialized,
    Seeded,
    Stable,
}

#[derive(Debug, Clone, Default)]
pub struct SectionView {
    state: OrderState,
}

impl SectionView {
    #[must_use]
    pub const fn state(&self) -> OrderState {
        self.state
    }

    /// Visual order of `section`, writing it back to `table` when it differs
    /// from what is stored.
    pub fn observe(
        &mut self,
        section: &SectionId,
        natural: &[NaturalEntry],
        table: &mut AttributeOrderTable,
    ) -> Vec<String> {
        let stored = table.resolved(section);
        let order = reconcile(natural, stored.as_deref());

        if stored.as_ref() != Some(&order) {
            debug!(
                section = %section,
                seeded = stored.is_none(),
                keys = order.len(),
                "stored attribute order"
            );
            table.set_resolved(section.clone(), &order);
        }

        self.state = match self.state {
            OrderState::Uninitialized => OrderState::Seeded,
            OrderState::Seeded | OrderState::Stable => OrderState::Stable,
        };
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::natural::Origin;
    use pretty_assertions::assert_eq;

    fn entry(key: &str) -> NaturalEntry {
        NaturalEntry {
            key: key.to_string(),
            origin: Origin::Added {
                transformation_id: key.to_string(),
                substring_of: None,
            },
        }
    }

    #[test]
    fn first_observation_seeds_the_table() {
        let section = SectionId::resource(0);
        let mut table = AttributeOrderTable::new();
        let mut view = SectionView::default();
        assert_eq!(view.state(), OrderState::Uninitialized);

        let order = view.observe(&section, &[entry("a"), entry("b")], &mut table);
        assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(table.get(&section), Some(order.as_slice()));
        assert_eq!(view.state(), OrderState::Seeded);

        view.observe(&section, &[entry("a"), entry("b")], &mut table);
        assert_eq!(view.state(), OrderState::Stable);
    }

    #[test]
    fn later_observations_keep_the_stored_order() {
        let section = SectionId::resource(0);
        let mut table = AttributeOrderTable::new();
        table.set(section.clone(), vec!["b".into(), "a".into()]);
        let mut view = SectionView::default();

        let order = view.observe(&section, &[entry("new"), entry("a"), entry("b")], &mut table);
        assert_eq!(order, vec!["new", "b", "a"]);
        assert_eq!(table.get(&section).unwrap(), order.as_slice());
    }
}
