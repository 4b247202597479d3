use std::time::Instant;

use otx_core::display::Tree;
use otx_core::enums::FailureIsolation;
use otx_core::order::AttributeOrderTable;
use otx_core::record::ResourceSpan;
use otx_core::result::{ExecutionResult, TransformationFailure};
use otx_core::transformation::Transformation;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::options::ExecuteOptions;
use crate::ordering::apply_order;
use crate::run::Run;

pub struct TransformationEngine;

impl TransformationEngine {
    /// Replay `log` against a deep clone of `record`.
    ///
    /// Transformations run in `order` sequence; only active ones run. Each
    /// sees the effects of the ones before it. The returned tree is derived
    /// from the mutated record, stamped, and ordered by `order_table`.
    #[must_use]
    pub fn execute(
        record: &ResourceSpan,
        log: &[Transformation],
        order_table: &AttributeOrderTable,
        options: &ExecuteOptions,
    ) -> ExecutionResult {
        let start = Instant::now();

        let mut executable: Vec<&Transformation> =
            log.iter().filter(|t| t.status.is_executable()).collect();
        executable.sort_by_key(|t| t.order);

        let mut run = Run::new(record.clone(), *options);
        let mut applied_count = 0usize;
        let mut failures = Vec::new();

        for t in executable {
            match run.apply(t) {
                Ok(()) => applied_count += 1,
                Err(error) => match options.isolation {
                    FailureIsolation::Batch => {
                        warn!(transformation_id = %t.id, %error, "transformation failed; discarding batch");
                        return Self::batch_failure(record, t, &error, start);
                    }
                    FailureIsolation::PerTransformation => {
                        warn!(transformation_id = %t.id, %error, "transformation failed; skipping");
                        failures.push(failure(t, &error));
                    }
                },
            }
        }

        let (transformed_record, mut transformed_tree, warnings) = run.finish();
        count_updates(&mut transformed_tree, log);
        apply_order(&mut transformed_tree, order_table);

        let execution_time_ms = elapsed_ms(start);
        debug!(
            applied = applied_count,
            failed = failures.len(),
            warnings = warnings.len(),
            execution_time_ms,
            "executed transformation log"
        );

        ExecutionResult {
            transformed_record,
            transformed_tree,
            applied_count,
            execution_time_ms,
            failures,
            warnings,
        }
    }

    /// The whole run is discarded: nothing applied, the untransformed record,
    /// and the tree of the original.
    fn batch_failure(
        record: &ResourceSpan,
        t: &Transformation,
        error: &EngineError,
        start: Instant,
    ) -> ExecutionResult {
        ExecutionResult {
            transformed_record: record.clone(),
            transformed_tree: otx_parser::parse_one(record),
            applied_count: 0,
            execution_time_ms: elapsed_ms(start),
            failures: vec![failure(t, error)],
            warnings: Vec::new(),
        }
    }
}

fn failure(t: &Transformation, error: &EngineError) -> TransformationFailure {
    TransformationFailure {
        transformation_id: t.id.clone(),
        kind: t.kind(),
        message: error.to_string(),
        attribute_path: t.params.target().map(|(path, _)| path.to_string()),
    }
}

/// Number of log entries scoped to each section.
fn count_updates(tree: &mut Tree, log: &[Transformation]) {
    for section in &mut tree.sections {
        section.update_count = log.iter().filter(|t| t.section_id == section.id).count();
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
