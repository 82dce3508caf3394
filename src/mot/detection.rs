use serde::{Deserialize, Serialize};

use crate::mot::mot_errors::TrackerError;
use crate::utils::{BBox, Point};

/// One object observed in one frame, as produced by an external detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    // Informational only. Neither the tracker nor the anomaly detector reads it
    #[serde(default)]
    pub confidence: f32,
    pub bbox: BBox,
}

impl Detection {
    /// Creates new detection
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::mot::Detection;
    /// use mot_anomaly::utils::{BBox, Point};
    /// let det = Detection::new("car", 0.87, BBox::new(100, 120, 200, 180));
    /// assert_eq!(det.get_center(), Point::new(150, 150));
    /// ```
    pub fn new(class_name: impl Into<String>, confidence: f32, bbox: BBox) -> Self {
        Detection {
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }
    pub fn get_center(&self) -> Point {
        self.bbox.center()
    }
    /// Rejects input the tracking core is not defined for.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.bbox.is_well_formed() {
            return Err(TrackerError::InvalidBBox {
                class_name: self.class_name.clone(),
                bbox: self.bbox,
            });
        }
        if !self.confidence.is_finite() {
            return Err(TrackerError::InvalidConfidence {
                class_name: self.class_name.clone(),
                confidence: self.confidence,
            });
        }
        Ok(())
    }
}
