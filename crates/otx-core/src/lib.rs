//! # otx-core
//!
//! Core types, ID generation, and error types for otx.
//!
//! This crate provides the foundational types shared across all otx crates:
//! - The OTLP-shaped telemetry record (resource, scope, spans, attributes)
//! - Display tree types derived from a record (sections of display attributes)
//! - Structured section ids and attribute paths
//! - The transformation data model and its validating constructors
//! - The attribute order table with its rename alias table
//! - Execution result types
//! - Kind/status enums and cross-cutting error types
//! - Value arithmetic shared by the engine and the session (mask, substring)
//! - The bundled sample record

pub mod display;
pub mod enums;
pub mod errors;
pub mod fixtures;
pub mod ids;
pub mod input;
pub mod order;
pub mod path;
pub mod record;
pub mod result;
pub mod section;
pub mod text;
pub mod transformation;
