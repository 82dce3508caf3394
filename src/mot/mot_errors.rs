use thiserror::Error;

use crate::utils::BBox;

/// Errors raised around the tracking core.
///
/// `CentroidTracker::update` and `AnomalyDetector::analyze` never fail; these
/// come from validating input before it reaches them and from loading
/// configuration.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("detection '{class_name}' has a malformed bounding box {bbox}: expected non-negative coordinates with x1 < x2 and y1 < y2")]
    InvalidBBox { class_name: String, bbox: BBox },
    #[error("detection '{class_name}' has a non-finite confidence {confidence}")]
    InvalidConfidence { class_name: String, confidence: f32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
