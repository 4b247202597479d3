//! State of one engine run and the per-kind apply steps.
//!
//! Every apply step resolves everything it needs (collections, target index)
//! before touching the record, so a step that fails leaves no partial edit.

use otx_core::display::{AttributeModification, DisplayAttribute, Tree};
use otx_core::enums::{TransformationKind, ValueType};
use otx_core::path::{AttributeLocation, CollectionRef};
use otx_core::record::{AnyValue, KeyValue, ResourceSpan};
use otx_core::result::TransformationWarning;
use otx_core::section::SectionId;
use otx_core::text;
use otx_core::transformation::{
    AddStaticParams, AddSubstringParams, DeleteParams, MaskParams, RawStatementParams,
    RenameKeyParams, Transformation, TransformationParams,
};
use otx_parser::value_to_string;
use tracing::{debug, warn};

use crate::derived::DerivedSet;
use crate::error::EngineError;
use crate::options::ExecuteOptions;
use crate::stamps::StampTable;

/// A raw statement waiting to be shown in its section.
#[derive(Debug)]
struct PendingStatement {
    transformation_id: String,
    section: SectionId,
    statement: String,
}

pub(crate) struct Run {
    record: ResourceSpan,
    options: ExecuteOptions,
    stamps: StampTable,
    derived: DerivedSet,
    statements: Vec<PendingStatement>,
    warnings: Vec<TransformationWarning>,
}

impl Run {
    pub(crate) fn new(record: ResourceSpan, options: ExecuteOptions) -> Self {
        Self {
            record,
            options,
            stamps: StampTable::default(),
            derived: DerivedSet::default(),
            statements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Apply one transformation to the working record.
    pub(crate) fn apply(&mut self, t: &Transformation) -> Result<(), EngineError> {
        match &t.params {
            TransformationParams::AddStatic(p) => self.add_static(t, p),
            TransformationParams::AddSubstring(p) => self.add_substring(t, p),
            TransformationParams::Delete(p) => self.delete(t, p),
            TransformationParams::Mask(p) => self.mask(t, p),
            TransformationParams::RenameKey(p) => self.rename(t, p),
            TransformationParams::RawStatement(p) => {
                self.raw_statement(t, p);
                Ok(())
            }
        }
    }

    /// Finish the run: re-derive substrings, build and stamp the tree.
    pub(crate) fn finish(mut self) -> (ResourceSpan, Tree, Vec<TransformationWarning>) {
        for stale in self.derived.rederive(&mut self.record) {
            warn!(
                transformation_id = %stale.transformation_id,
                source_key = %stale.source_key,
                "substring source no longer present"
            );
            self.warnings.push(TransformationWarning {
                transformation_id: stale.transformation_id,
                message: format!(
                    "substring source '{}' no longer present; value is empty",
                    stale.source_key
                ),
            });
        }

        let mut tree = otx_parser::parse_one(&self.record);
        self.stamps.apply_to(&mut tree);
        self.inject_statements(&mut tree);
        (self.record, tree, self.warnings)
    }

    // -----------------------------------------------------------------------
    // Apply steps
    // -----------------------------------------------------------------------

    fn add_static(&mut self, t: &Transformation, p: &AddStaticParams) -> Result<(), EngineError> {
        let section = &p.insertion_section_id;
        let collection = self.resolve(section)?;
        let attributes = self.collection_mut(section)?;
        attributes.insert(0, KeyValue::string(p.key.as_str(), p.value.as_str()));

        self.derived.shadow(collection, &p.key);

        self.stamps
            .push(section, &p.key, t, TransformationKind::AddStatic.badge().into());
        debug!(transformation_id = %t.id, section = %section, key = %p.key, "added static attribute");
        Ok(())
    }

    fn add_substring(
        &mut self,
        t: &Transformation,
        p: &AddSubstringParams,
    ) -> Result<(), EngineError> {
        let section = &p.insertion_section_id;
        let collection = self.resolve(section)?;

        let source = AttributeLocation::parse(&p.source_attribute_path);
        let source_value = source.and_then(|loc| {
            let attrs = self.record.attributes(loc.collection)?;
            let i = locate(attrs, Some(loc), loc.collection, &p.source_key)?;
            Some(value_to_string(&attrs[i].value))
        });
        let value = source_value.map_or_else(String::new, |v| {
            text::substring(&v, p.substring_start, p.substring_end)
        });

        let attributes = self.collection_mut(section)?;
        attributes.insert(0, KeyValue::string(p.new_key.as_str(), value));

        self.derived.shadow(collection, &p.new_key);
        self.derived
            .record(&t.id, collection, source.map(|loc| loc.collection), p);
        self.stamps
            .push(section, &p.new_key, t, TransformationKind::AddSubstring.badge().into());
        debug!(transformation_id = %t.id, section = %section, key = %p.new_key, "added substring attribute");
        Ok(())
    }

    fn delete(&mut self, t: &Transformation, p: &DeleteParams) -> Result<(), EngineError> {
        let (collection, index) =
            match self.target(t, &p.attribute_path, &p.attribute_key)? {
                Some(found) => found,
                None => return Ok(()),
            };
        if let Some(attributes) = self.record.attributes_mut(collection) {
            attributes.remove(index);
        }

        self.derived.pin(collection, &p.attribute_key);
        self.stamps.clear(&t.section_id, &p.attribute_key);
        debug!(transformation_id = %t.id, key = %p.attribute_key, "deleted attribute");
        Ok(())
    }

    fn mask(&mut self, t: &Transformation, p: &MaskParams) -> Result<(), EngineError> {
        let (collection, index) =
            match self.target(t, &p.attribute_path, &p.attribute_key)? {
                Some(found) => found,
                None => return Ok(()),
            };
        let Some(kv) = self
            .record
            .attributes_mut(collection)
            .and_then(|attrs| attrs.get_mut(index))
        else {
            return Ok(());
        };

        let current = value_to_string(&kv.value);
        kv.value = AnyValue::StringValue(text::mask(&current, p.mask_start, p.mask_end, p.mask_char));

        self.derived.pin(collection, &p.attribute_key);
        self.stamps.push(
            &t.section_id,
            &p.attribute_key,
            t,
            text::mask_label(&current, p.mask_start, p.mask_end),
        );
        debug!(transformation_id = %t.id, key = %p.attribute_key, "masked attribute");
        Ok(())
    }

    fn rename(&mut self, t: &Transformation, p: &RenameKeyParams) -> Result<(), EngineError> {
        let (collection, index) = match self.target(t, &p.attribute_path, &p.old_key)? {
            Some(found) => found,
            None => return Ok(()),
        };
        if let Some(kv) = self
            .record
            .attributes_mut(collection)
            .and_then(|attrs| attrs.get_mut(index))
        {
            kv.key.clone_from(&p.new_key);
        }

        self.derived.rename(collection, &p.old_key, &p.new_key);
        self.derived
            .rename_source(collection, &p.old_key, &p.new_key);
        self.stamps.rename(&t.section_id, &p.old_key, &p.new_key);
        self.stamps.push(
            &t.section_id,
            &p.new_key,
            t,
            TransformationKind::RenameKey.badge().into(),
        );
        debug!(transformation_id = %t.id, old_key = %p.old_key, new_key = %p.new_key, "renamed attribute");
        Ok(())
    }

    fn raw_statement(&mut self, t: &Transformation, p: &RawStatementParams) {
        self.statements.push(PendingStatement {
            transformation_id: t.id.clone(),
            section: p.insertion_section_id.clone(),
            statement: p.statement.clone(),
        });
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Collection a section edits, checked against the record.
    fn resolve(&self, section: &SectionId) -> Result<CollectionRef, EngineError> {
        let collection = section
            .collection()
            .ok_or_else(|| EngineError::NoAttributeCollection {
                section: section.clone(),
            })?;
        if self.record.attributes(collection).is_none() {
            return Err(EngineError::MissingCollection {
                section: section.clone(),
            });
        }
        Ok(collection)
    }

    fn collection_mut(&mut self, section: &SectionId) -> Result<&mut Vec<KeyValue>, EngineError> {
        let collection = self.resolve(section)?;
        self.record
            .attributes_mut(collection)
            .ok_or_else(|| EngineError::MissingCollection {
                section: section.clone(),
            })
    }

    /// Locate the existing attribute a Delete/Mask/Rename edits.
    ///
    /// `Ok(None)` is the target-not-found case: recorded as a warning and
    /// otherwise a no-op.
    fn target(
        &mut self,
        t: &Transformation,
        path: &str,
        key: &str,
    ) -> Result<Option<(CollectionRef, usize)>, EngineError> {
        let collection = self.resolve(&t.section_id)?;
        let location = AttributeLocation::parse(path);
        let found = self
            .record
            .attributes(collection)
            .and_then(|attrs| locate(attrs, location, collection, key));

        match found {
            Some(index) => Ok(Some((collection, index))),
            None => {
                warn!(
                    transformation_id = %t.id,
                    section = %t.section_id,
                    key,
                    "target attribute not found; skipping"
                );
                if self.options.warn_on_missing_target {
                    self.warnings.push(TransformationWarning {
                        transformation_id: t.id.clone(),
                        message: format!(
                            "{} target '{key}' not found in {}",
                            t.kind(),
                            t.section_id
                        ),
                    });
                }
                Ok(None)
            }
        }
    }

    /// Show each raw statement at the top of its section, newest first.
    fn inject_statements(&mut self, tree: &mut Tree) {
        for pending in &self.statements {
            let Some(section) = tree.section_mut(&pending.section) else {
                warn!(
                    transformation_id = %pending.transformation_id,
                    section = %pending.section,
                    "raw statement section not in tree"
                );
                self.warnings.push(TransformationWarning {
                    transformation_id: pending.transformation_id.clone(),
                    message: format!("section {} not present; statement not shown", pending.section),
                });
                continue;
            };
            let kind = TransformationKind::RawStatement;
            section.attributes.insert(
                0,
                DisplayAttribute {
                    id: format!("{}-ottl-{}", pending.section, pending.transformation_id),
                    path: format!("{}.ottl-{}", pending.section, pending.transformation_id),
                    section_id: pending.section.clone(),
                    key: RawStatementParams::DISPLAY_KEY.to_string(),
                    value: pending.statement.clone(),
                    value_type: ValueType::String,
                    depth: 0,
                    modifications: vec![AttributeModification {
                        transformation_id: pending.transformation_id.clone(),
                        kind,
                        label: kind.badge().to_string(),
                        color: kind.color(),
                    }],
                },
            );
        }
    }
}

/// Index of `key` in `attributes`: the path's index when it still holds that
/// key, otherwise the first attribute with that key.
fn locate(
    attributes: &[KeyValue],
    location: Option<AttributeLocation>,
    collection: CollectionRef,
    key: &str,
) -> Option<usize> {
    location
        .filter(|loc| loc.collection == collection)
        .map(|loc| loc.index)
        .filter(|&i| attributes.get(i).is_some_and(|kv| kv.key == key))
        .or_else(|| attributes.iter().position(|kv| kv.key == key))
}
