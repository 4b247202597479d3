//! Reconciliation of a stored order against the current attribute set.

use std::collections::BTreeMap;

use crate::natural::NaturalEntry;

/// Visual key order for a section.
///
/// With no stored order the natural order is used as is. Otherwise the
/// stored keys are kept, in stored order, for as many attributes as still
/// carry them; stored keys with no attribute are dropped. Attributes the
/// stored order does not account for are placed as follows: a live
/// substring directly above its source, any other new attribute on top. A
/// substring whose source is gone goes to the bottom.
///
/// Reconciling against a previous result of this function returns it
/// unchanged.
#[must_use]
pub fn reconcile(natural: &[NaturalEntry], stored: Option<&[String]>) -> Vec<String> {
    let Some(stored) = stored else {
        return natural.iter().map(|e| e.key.clone()).collect();
    };

    let mut available: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in natural {
        *available.entry(entry.key.as_str()).or_default() += 1;
    }

    let mut kept = Vec::with_capacity(natural.len());
    for key in stored {
        if let Some(count) = available.get_mut(key.as_str()) {
            if *count > 0 {
                *count -= 1;
                kept.push(key.clone());
            }
        }
    }

    let mut fresh = Vec::new();
    for entry in natural {
        if let Some(count) = available.get_mut(entry.key.as_str()) {
            if *count > 0 {
                *count -= 1;
                fresh.push(entry);
            }
        }
    }

    let (substrings, others): (Vec<_>, Vec<_>) =
        fresh.into_iter().partition(|e| e.substring_of().is_some());

    let mut order: Vec<String> = others.into_iter().map(|e| e.key.clone()).collect();
    order.extend(kept);

    let mut orphans = Vec::new();
    for entry in substrings {
        let source = entry.substring_of().unwrap_or_default();
        match order.iter().position(|k| k == source) {
            Some(index) => order.insert(index, entry.key.clone()),
            None => orphans.push(entry.key.clone()),
        }
    }
    order.extend(orphans);
    order
}
