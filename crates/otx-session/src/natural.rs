//! Natural attribute order of a section.
//!
//! The order a section's attributes take before the user drags anything:
//! newly added attributes on top (newest first), then the attributes of the
//! source record, with each live substring placed directly above the
//! attribute it is cut from.

use std::collections::BTreeSet;

use otx_core::display::Section;
use otx_core::order::KeyAliases;
use otx_core::transformation::{RawStatementParams, TransformationParams};

use crate::log::TransformationLog;

/// Where a visually ordered attribute comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// An attribute of the source record.
    Source {
        path: String,
        original_key: String,
        value: String,
    },
    /// An attribute introduced by an additive transformation.
    Added {
        transformation_id: String,
        /// Source key, for a live substring.
        substring_of: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalEntry {
    /// Key as currently displayed, renames applied.
    pub key: String,
    pub origin: Origin,
}

impl NaturalEntry {
    #[must_use]
    pub fn substring_of(&self) -> Option<&str> {
        match &self.origin {
            Origin::Added {
                substring_of: Some(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// Natural order for `section` of the source tree.
///
/// Source attributes removed by a Delete whose id is in `moved_out` are left
/// out: they now live in another section.
#[must_use]
pub fn natural_order(
    section: &Section,
    log: &TransformationLog,
    aliases: &KeyAliases,
    moved_out: &BTreeSet<String>,
) -> Vec<NaturalEntry> {
    let id = &section.id;
    let added: Vec<_> = log
        .iter()
        .filter(|t| t.kind().is_additive() && &t.section_id == id)
        .collect();

    let mut entries: Vec<NaturalEntry> = added
        .iter()
        .rev()
        .filter_map(|t| {
            let key = match &t.params {
                TransformationParams::AddStatic(p) => p.key.clone(),
                TransformationParams::RawStatement(_) => RawStatementParams::DISPLAY_KEY.to_string(),
                _ => return None,
            };
            Some(NaturalEntry {
                key,
                origin: Origin::Added {
                    transformation_id: t.id.clone(),
                    substring_of: None,
                },
            })
        })
        .collect();

    let removed: Vec<(&str, &str)> = log
        .by_section(id)
        .filter(|t| moved_out.contains(&t.id))
        .filter_map(|t| t.params.target())
        .collect();

    entries.extend(
        section
            .attributes
            .iter()
            .map(|a| NaturalEntry {
                key: aliases.resolve(id, &a.key),
                origin: Origin::Source {
                    path: a.path.clone(),
                    original_key: a.key.clone(),
                    value: a.value.clone(),
                },
            })
            .filter(|e| !removed.iter().any(|&(path, key)| is_source_at(e, path, key))),
    );

    for t in &added {
        let TransformationParams::AddSubstring(p) = &t.params else {
            continue;
        };
        let source = aliases.resolve(id, &p.source_key);
        let entry = NaturalEntry {
            key: p.new_key.clone(),
            origin: Origin::Added {
                transformation_id: t.id.clone(),
                substring_of: Some(source.clone()),
            },
        };
        let above = entries
            .iter()
            .position(|e| matches!(e.origin, Origin::Source { .. }) && e.key == source);
        match above {
            Some(index) => entries.insert(index, entry),
            None => entries.push(entry),
        }
    }

    entries
}

fn is_source_at(entry: &NaturalEntry, path: &str, key: &str) -> bool {
    matches!(&entry.origin, Origin::Source { path: p, .. } if p == path) && entry.key == key
}
