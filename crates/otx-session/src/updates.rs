//! Transformation update builder.

use otx_core::enums::TransformationStatus;
use otx_core::section::SectionId;
use otx_core::transformation::{Transformation, TransformationParams};
use serde::Serialize;

/// Partial fields for [`TransformationLog::update`]. `None` leaves a field as is.
///
/// [`TransformationLog::update`]: crate::log::TransformationLog::update
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransformationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<TransformationParams>,
}

impl TransformationUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.section_id.is_none() && self.status.is_none() && self.params.is_none()
    }

    /// Shallow-merge the set fields into `t`.
    pub fn apply_to(self, t: &mut Transformation) {
        if let Some(section_id) = self.section_id {
            t.section_id = section_id;
        }
        if let Some(status) = self.status {
            t.status = status;
        }
        if let Some(params) = self.params {
            t.params = params;
        }
    }
}

pub struct TransformationUpdateBuilder(TransformationUpdate);

impl Default for TransformationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TransformationUpdate::default())
    }

    #[must_use]
    pub fn section_id(mut self, section_id: SectionId) -> Self {
        self.0.section_id = Some(section_id);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TransformationStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn params(mut self, params: TransformationParams) -> Self {
        self.0.params = Some(params);
        self
    }

    #[must_use]
    pub fn build(self) -> TransformationUpdate {
        self.0
    }
}
