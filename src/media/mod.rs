//! Image references as stored by admin forms (coaches, classes, events,
//! gallery) and rendered by public pages.

use crate::crop::AspectRatio;
use crate::geometry::FocalPoint;
use crate::positioner::{
    CropPositioner, EditOutcome, MeasureContainer, PositionerResult, SessionId,
};
use serde::{Deserialize, Serialize};

/// An uploaded image plus the focal point chosen for it, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageField {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<FocalPoint>,
}

impl ImageField {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            focal_point: None,
        }
    }

    pub fn with_focal_point(mut self, focal_point: FocalPoint) -> Self {
        self.focal_point = Some(focal_point);
        self
    }

    /// `object-position` for the image inside a fixed-aspect box. Images
    /// that were never positioned render centered.
    ///
    /// The stored point does not remember which ratio it was picked for, so
    /// boxes of a different shape only approximate the original framing.
    pub fn object_position(&self) -> String {
        self.focal_point.unwrap_or_default().css_position()
    }

    /// Opens a crop session for this image, resuming from the stored point.
    pub fn begin_edit<M: MeasureContainer>(
        &self,
        positioner: &mut CropPositioner<M>,
        aspect: AspectRatio,
    ) -> PositionerResult<SessionId> {
        positioner.open_with_focal(self.url.clone(), aspect, self.focal_point)
    }

    /// Stores a confirmed point; a cancelled edit leaves the field untouched.
    pub fn apply_edit(&mut self, outcome: EditOutcome) -> bool {
        match outcome {
            EditOutcome::Confirmed(focal_point) => {
                self.focal_point = Some(focal_point);
                true
            }
            EditOutcome::Cancelled => false,
        }
    }
}
