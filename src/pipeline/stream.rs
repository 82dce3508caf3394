use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anomaly::AnomalyDetector;
use crate::mot::{CentroidTracker, Detection, TrackId, TrackerError};
use crate::pipeline::Config;
use crate::utils::Point;

/// Output of one processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub stream_id: Uuid,
    /// 1-based position of the frame in the stream
    pub frame: usize,
    pub tracks: BTreeMap<TrackId, Point>,
    /// Identifiers evicted while processing this frame
    pub removed: Vec<TrackId>,
    /// Findings joined with `"; "`, empty when nothing was found
    pub findings: String,
    pub processed_at: DateTime<Utc>,
}

impl FrameReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
    /// Individual findings, one per overlay line
    pub fn finding_lines(&self) -> Vec<&str> {
        if self.findings.is_empty() {
            return Vec::new();
        }
        self.findings.split("; ").collect()
    }
}

/// Tracker and anomaly detector for a single video stream.
///
/// Frames must arrive in order. Independent streams get independent
/// pipelines; nothing is shared between instances.
pub struct StreamPipeline {
    id: Uuid,
    tracker: CentroidTracker,
    detector: AnomalyDetector,
    frames_seen: usize,
}

impl StreamPipeline {
    /// Creates new pipeline for one stream
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::mot::Detection;
    /// use mot_anomaly::pipeline::{Config, StreamPipeline};
    /// use mot_anomaly::utils::BBox;
    /// let mut stream = StreamPipeline::new(&Config::default());
    /// let report = stream.process_frame(&[Detection::new("car", 0.9, BBox::new(100, 120, 200, 180))]).unwrap();
    /// assert_eq!(report.frame, 1);
    /// assert!(!report.has_findings());
    /// ```
    pub fn new(config: &Config) -> Self {
        let id = Uuid::new_v4();
        let tracker = config.build_tracker();
        let detector = config.build_detector();
        info!("Stream {} started\n\t{}\n\t{}", id, tracker, detector);
        StreamPipeline {
            id,
            tracker,
            detector,
            frames_seen: 0,
        }
    }
    pub fn get_id(&self) -> Uuid {
        self.id
    }
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }
    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }
    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// Runs one frame through the tracker and the anomaly detector.
    ///
    /// A frame with a malformed detection is rejected as a whole and neither
    /// component sees it. The frame still counts toward the frame number.
    pub fn process_frame(&mut self, detections: &[Detection]) -> Result<FrameReport, TrackerError> {
        self.frames_seen += 1;
        let frame = self.frames_seen;
        if let Err(err) = detections.iter().try_for_each(|d| d.validate()) {
            warn!("Stream {}: frame {} rejected: {}", self.id, frame, err);
            return Err(err);
        }

        let tracks = self.tracker.update(detections);
        let removed = self.tracker.removed().to_vec();
        self.detector.forget_all(&removed);
        let findings = self.detector.analyze(detections, &tracks);

        Ok(FrameReport {
            stream_id: self.id,
            frame,
            tracks,
            removed,
            findings,
            processed_at: Utc::now(),
        })
    }
}

/// Tracks and analyzes a whole sequence of frames with fresh components,
/// returning one findings string per frame.
pub fn run_batch(config: &Config, frames: &[Vec<Detection>]) -> Result<Vec<String>, TrackerError> {
    let mut stream = StreamPipeline::new(config);
    frames
        .iter()
        .map(|detections| stream.process_frame(detections).map(|report| report.findings))
        .collect()
}
