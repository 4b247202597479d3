//! Execution result types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::display::Tree;
use crate::enums::TransformationKind;
use crate::record::ResourceSpan;

/// Output of one engine run. Recomputed from scratch on every run; the caller
/// keeps only the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionResult {
    pub transformed_record: ResourceSpan,
    pub transformed_tree: Tree,
    /// Active transformations attempted, whether or not their target was found.
    pub applied_count: usize,
    pub execution_time_ms: f64,
    pub failures: Vec<TransformationFailure>,
    pub warnings: Vec<TransformationWarning>,
}

impl ExecutionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.transformed_tree
    }
}

/// A transformation that raised an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformationFailure {
    pub transformation_id: String,
    pub kind: TransformationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<String>,
}

/// A non-fatal condition, such as a target attribute that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformationWarning {
    pub transformation_id: String,
    pub message: String,
}
