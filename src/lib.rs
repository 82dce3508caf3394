//! Centroid multi-object tracking with temporal anomaly detection for traffic video.
//!
//! Frames flow one way: detections go into [`mot::CentroidTracker`], the
//! resulting identity to centroid mapping plus the same detections go into
//! [`anomaly::AnomalyDetector`], which reports findings for the frame.
//! [`pipeline::StreamPipeline`] wires both together for a single stream.
pub mod anomaly;
pub mod mot;
pub mod pipeline;
pub mod utils;
