//! The editing session.
//!
//! [`TransformSession`] owns everything a single editing context needs: the
//! source record, the transformation log, the attribute order table, the
//! per-section order lifecycle, and the most recent execution result. All
//! log and order mutations go through it so that rename aliases and the
//! pending-changes flag stay in step with the log.

use std::collections::{BTreeMap, BTreeSet};

use otx_config::OtxConfig;
use otx_core::display::{AttributeModification, Tree};
use otx_core::errors::CoreError;
use otx_core::order::AttributeOrderTable;
use otx_core::record::ResourceSpan;
use otx_core::result::ExecutionResult;
use otx_core::section::SectionId;
use otx_core::text;
use otx_core::transformation::{
    MaskParams, RangeEnd, RawStatementParams, Transformation, TransformationParams,
};
use otx_engine::{ExecuteOptions, TransformationEngine};
use tracing::debug;

use crate::error::SessionError;
use crate::log::TransformationLog;
use crate::natural::{NaturalEntry, natural_order};
use crate::updates::{TransformationUpdate, TransformationUpdateBuilder};
use crate::view::{OrderState, SectionView};

/// Label of the stamp on a source attribute that was dragged to another section.
pub const MOVED_OUT_LABEL: &str = "MOVED OUT";

#[derive(Debug, Clone)]
pub struct TransformSession {
    pub(crate) record: ResourceSpan,
    pub(crate) source_tree: Tree,
    pub(crate) log: TransformationLog,
    pub(crate) order: AttributeOrderTable,
    pub(crate) views: BTreeMap<SectionId, SectionView>,
    /// Ids of the Deletes created by cross-section moves.
    pub(crate) moved_out: BTreeSet<String>,
    options: ExecuteOptions,
    mask_char: char,
    last_result: Option<ExecutionResult>,
    pub(crate) dirty: bool,
}

impl TransformSession {
    /// Session over `record` with default settings.
    #[must_use]
    pub fn new(record: ResourceSpan) -> Self {
        Self::with_config(record, &OtxConfig::default())
    }

    /// Session over `record` with settings loaded from config files and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if the configuration cannot be loaded.
    pub fn load(record: ResourceSpan) -> Result<Self, SessionError> {
        let config = OtxConfig::load()?;
        Ok(Self::with_config(record, &config))
    }

    #[must_use]
    pub fn with_config(record: ResourceSpan, config: &OtxConfig) -> Self {
        let options = ExecuteOptions::default()
            .with_isolation(config.engine.isolation)
            .with_missing_target_warnings(config.engine.warn_on_missing_target);
        let source_tree = otx_parser::parse_one(&record);
        Self {
            record,
            source_tree,
            log: TransformationLog::new(),
            order: AttributeOrderTable::new(),
            views: BTreeMap::new(),
            moved_out: BTreeSet::new(),
            options,
            mask_char: config.general.default_mask_char,
            last_result: None,
            dirty: false,
        }
    }

    #[must_use]
    pub const fn record(&self) -> &ResourceSpan {
        &self.record
    }

    /// Display tree of the untransformed record.
    #[must_use]
    pub const fn source_tree(&self) -> &Tree {
        &self.source_tree
    }

    #[must_use]
    pub const fn log(&self) -> &TransformationLog {
        &self.log
    }

    #[must_use]
    pub const fn order_table(&self) -> &AttributeOrderTable {
        &self.order
    }

    #[must_use]
    pub const fn options(&self) -> &ExecuteOptions {
        &self.options
    }

    #[must_use]
    pub const fn last_result(&self) -> Option<&ExecutionResult> {
        self.last_result.as_ref()
    }

    /// Whether the log or order changed since the last [`execute`](Self::execute).
    #[must_use]
    pub const fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    // -----------------------------------------------------------------------
    // Log
    // -----------------------------------------------------------------------

    /// Append `t` to the log.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateId` if the id is already in the log.
    pub fn add(&mut self, t: Transformation) -> Result<String, SessionError> {
        let id = t.id.clone();
        let alias = rename_of(&t);
        self.log.add(t)?;
        if let Some((section, from, to)) = alias {
            self.order.aliases_mut().record(&section, &from, &to);
        }
        self.dirty = true;
        Ok(id)
    }

    /// Build a transformation with a fresh id and append it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Core` if no id can be generated.
    pub fn push(
        &mut self,
        section: SectionId,
        params: TransformationParams,
    ) -> Result<String, SessionError> {
        self.add(Transformation::new(section, params)?)
    }

    /// Merge `update` into the entry `id`. An unknown id is a no-op and
    /// returns `false`.
    pub fn update(&mut self, id: &str, update: TransformationUpdate) -> bool {
        if update.is_empty() {
            return self.log.get(id).is_some();
        }
        let Some(previous) = self.log.update(id, update) else {
            return false;
        };
        if let Some((section, from, _)) = rename_of(&previous) {
            self.order.aliases_mut().forget(&section, &from);
        }
        if let Some((section, from, to)) = self.log.get(id).and_then(rename_of) {
            self.order.aliases_mut().record(&section, &from, &to);
        }
        self.dirty = true;
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Transformation> {
        let removed = self.log.remove(id)?;
        if let Some((section, from, _)) = rename_of(&removed) {
            self.order.aliases_mut().forget(&section, &from);
        }
        self.moved_out.remove(id);
        self.dirty = true;
        Some(removed)
    }

    /// Move the entry `id` to position `destination` of the log.
    pub fn reorder(&mut self, id: &str, destination: usize) -> bool {
        let moved = self.log.reorder(id, destination);
        self.dirty |= moved;
        moved
    }

    /// Drop the whole log and every stored order. Sections are re-seeded
    /// from their natural order on next observation.
    pub fn clear_all(&mut self) {
        debug!(transformations = self.log.len(), "clearing session");
        self.log.clear();
        self.order.clear();
        self.views.clear();
        self.moved_out.clear();
        self.dirty = true;
    }

    /// Replace the statement of a raw statement entry, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id and
    /// `CoreError::Validation` if the entry is not a raw statement or the new
    /// statement is blank.
    pub fn edit_statement(&mut self, id: &str, statement: &str) -> Result<(), SessionError> {
        let t = self.log.get(id).ok_or_else(|| CoreError::NotFound {
            entity_type: "transformation".into(),
            id: id.to_string(),
        })?;
        let TransformationParams::RawStatement(current) = &t.params else {
            return Err(CoreError::Validation(format!("{id} is not a raw statement")).into());
        };
        let params = RawStatementParams::new(statement, current.insertion_section_id.clone())?;
        self.update(
            id,
            TransformationUpdateBuilder::new()
                .params(TransformationParams::RawStatement(params))
                .build(),
        );
        Ok(())
    }

    /// Mask `[start, end)` of an attribute with the configured mask character.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Core` if the range is empty or the key blank.
    pub fn mask_selection(
        &mut self,
        section: SectionId,
        attribute_path: &str,
        key: &str,
        start: usize,
        end: RangeEnd,
    ) -> Result<String, SessionError> {
        let params = MaskParams::new(attribute_path, key, start, end, self.mask_char)?;
        self.push(section, TransformationParams::Mask(params))
    }

    // -----------------------------------------------------------------------
    // Order
    // -----------------------------------------------------------------------

    /// Store a key order for `section`, expressed in current keys.
    pub fn set_order(&mut self, section: SectionId, keys: &[String]) {
        self.order.set_resolved(section, keys);
        self.dirty = true;
    }

    #[must_use]
    pub fn view_state(&self, section: &SectionId) -> OrderState {
        self.views
            .get(section)
            .map_or(OrderState::Uninitialized, SectionView::state)
    }

    pub(crate) fn natural(&self, section: &SectionId) -> Result<Vec<NaturalEntry>, SessionError> {
        let source = self
            .source_tree
            .section(section)
            .ok_or_else(|| SessionError::UnknownSection(section.clone()))?;
        Ok(natural_order(
            source,
            &self.log,
            self.order.aliases(),
            &self.moved_out,
        ))
    }

    /// Current visual key order of `section`.
    ///
    /// The first call for a section seeds its stored order; later calls
    /// reconcile the stored order with the attributes now present.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSection` if the source tree has no such section.
    pub fn visual_order(&mut self, section: &SectionId) -> Result<Vec<String>, SessionError> {
        let natural = self.natural(section)?;
        let view = self.views.entry(section.clone()).or_default();
        Ok(view.observe(section, &natural, &mut self.order))
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Run the log against the source record and keep the result.
    pub fn execute(&mut self) -> &ExecutionResult {
        let result = TransformationEngine::execute(
            &self.record,
            self.log.as_slice(),
            &self.order,
            &self.options,
        );
        self.dirty = false;
        self.last_result.insert(result)
    }

    /// Stamps for a source attribute from the pending log: what will happen
    /// to it once the log runs.
    #[must_use]
    pub fn pre_transform_marks(&self, section: &SectionId, path: &str) -> Vec<AttributeModification> {
        let value = self
            .source_tree
            .section(section)
            .and_then(|s| s.attributes.iter().find(|a| a.path == path))
            .map_or("", |a| a.value.as_str());

        self.log
            .by_section(section)
            .filter(|t| t.params.target().is_some_and(|(p, _)| p == path))
            .map(|t| {
                let label = match &t.params {
                    TransformationParams::Mask(p) => {
                        text::mask_label(value, p.mask_start, p.mask_end)
                    }
                    TransformationParams::Delete(_) if self.moved_out.contains(&t.id) => {
                        MOVED_OUT_LABEL.to_string()
                    }
                    other => other.kind().badge().to_string(),
                };
                AttributeModification {
                    transformation_id: t.id.clone(),
                    kind: t.kind(),
                    label,
                    color: t.kind().color(),
                }
            })
            .collect()
    }
}

/// `(section, old, new)` of a rename.
fn rename_of(t: &Transformation) -> Option<(SectionId, String, String)> {
    match &t.params {
        TransformationParams::RenameKey(p) => {
            Some((t.section_id.clone(), p.old_key.clone(), p.new_key.clone()))
        }
        _ => None,
    }
}
