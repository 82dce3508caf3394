use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyDetector;
use crate::mot::{CentroidTracker, MatchingAlgorithm, TrackerError};

/// Settings for one stream's tracker and anomaly detector.
///
/// Every field may be omitted from a config file:
///
/// ```json
/// {
///   "tracker": { "max_distance": 100.0, "max_lost": 2, "algorithm": "nearest" },
///   "anomaly": { "movement_thresh": 10.0, "max_stationary_frames": 5, "min_traffic_threshold": 1 }
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub anomaly: AnomalyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Association radius in pixels
    pub max_distance: f32,
    /// Consecutive misses tolerated before a track is evicted
    pub max_lost: usize,
    pub algorithm: MatchingAlgorithm,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_distance: 100.0,
            max_lost: 2,
            algorithm: MatchingAlgorithm::Nearest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Displacement over the window below which an object is stopped
    pub movement_thresh: f32,
    /// Window length in frames
    pub max_stationary_frames: usize,
    /// Minimum expected vehicles per frame
    pub min_traffic_threshold: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        AnomalyConfig {
            movement_thresh: 10.0,
            max_stationary_frames: 5,
            min_traffic_threshold: 1,
        }
    }
}

impl Config {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_json_str(raw: &str) -> Result<Self, TrackerError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), TrackerError> {
        let max_distance = self.tracker.max_distance;
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "tracker.max_distance must be a positive finite number, got {}",
                max_distance
            )));
        }
        let movement_thresh = self.anomaly.movement_thresh;
        if !movement_thresh.is_finite() || movement_thresh < 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "anomaly.movement_thresh must be a non-negative finite number, got {}",
                movement_thresh
            )));
        }
        if self.anomaly.max_stationary_frames == 0 {
            return Err(TrackerError::InvalidConfig(
                "anomaly.max_stationary_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
    pub fn build_tracker(&self) -> CentroidTracker {
        CentroidTracker::new(self.tracker.max_distance, self.tracker.max_lost)
            .with_algorithm(self.tracker.algorithm)
    }
    pub fn build_detector(&self) -> AnomalyDetector {
        AnomalyDetector::new(
            self.anomaly.movement_thresh,
            self.anomaly.max_stationary_frames,
            self.anomaly.min_traffic_threshold,
        )
    }
}
