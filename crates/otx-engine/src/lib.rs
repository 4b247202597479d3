//! # otx-engine
//!
//! Transformation engine for otx.
//!
//! [`TransformationEngine::execute`] deep-clones the source record, applies
//! every active transformation in log order, re-derives the display tree from
//! the mutated record, stamps modification metadata onto the attributes the
//! log produced or edited, and finally applies the attribute order table.
//!
//! The engine is a pure function of its inputs. It never mutates the source
//! record and never returns an error: defects become `failures` entries of
//! the [`ExecutionResult`], contained per [`ExecuteOptions::isolation`].
//!
//! [`ExecutionResult`]: otx_core::result::ExecutionResult

mod derived;
mod engine;
pub mod error;
pub mod options;
mod ordering;
mod run;
mod stamps;

pub use engine::TransformationEngine;
pub use error::EngineError;
pub use options::ExecuteOptions;
pub use ordering::apply_order;
