//! # otx-session
//!
//! Editing session for otx: the transformation log store and the attribute
//! order bookkeeping that sits between the user's edits and the engine.
//!
//! - [`TransformationLog`]: ordered log with dense `order` numbering and
//!   section-scoped queries.
//! - [`natural_order`] and [`reconcile`]: the visual order of a section,
//!   derived from the source record and the log, then merged with the order
//!   the user stored.
//! - [`TransformSession`]: one editing context. Routes every mutation so
//!   rename aliases and stored orders stay in step with the log, handles
//!   drag-and-drop within and across sections, and runs the engine.

mod drag;
pub mod error;
pub mod log;
pub mod natural;
pub mod reconcile;
pub mod session;
pub mod updates;
pub mod view;

pub use error::SessionError;
pub use log::TransformationLog;
pub use natural::{NaturalEntry, Origin, natural_order};
pub use reconcile::reconcile;
pub use session::TransformSession;
pub use updates::{TransformationUpdate, TransformationUpdateBuilder};
pub use view::{OrderState, SectionView};
