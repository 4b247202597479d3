//! # otx-parser
//!
//! Display tree builder for otx.
//!
//! Converts OTLP resource spans into a flat-per-section [`Tree`]: one section
//! per resource, per span (info, attributes, events, links), and per scope.
//! Every attribute gets a structural `path` and a process-unique `id`.
//!
//! [`Tree`]: otx_core::display::Tree

pub mod tree;
pub mod value;

pub use tree::{parse, parse_one};
pub use value::{detect_value_type, value_to_string};
