use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use itertools::Itertools;
use log::trace;

use crate::anomaly::{is_vehicle, Finding, PositionHistory};
use crate::mot::{Detection, TrackId};
use crate::utils::Point;

/// Sliding-window temporal anomaly detector
///
/// Must be fed one frame at a time, in frame order, with the tracker output
/// for that same frame. It only reads the identity to centroid mapping and
/// never touches tracker state.
pub struct AnomalyDetector {
    // Endpoint displacement below which an object counts as stationary. Default 5.0
    movement_thresh: f32,
    // History window length and number of frames needed to report a stop. Default 3
    max_stationary_frames: usize,
    // Minimum expected vehicles per frame. Default 1
    min_traffic_threshold: usize,
    histories: HashMap<TrackId, PositionHistory>,
}

impl Default for AnomalyDetector {
    /// Creates default instance of AnomalyDetector
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::anomaly::AnomalyDetector;
    /// let mut detector = AnomalyDetector::default();
    /// ```
    fn default() -> Self {
        AnomalyDetector::new(5.0, 3, 1)
    }
}

impl AnomalyDetector {
    /// Creates new instance of AnomalyDetector
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::anomaly::AnomalyDetector;
    /// let movement_thresh: f32 = 10.0;
    /// let max_stationary_frames: usize = 5;
    /// let min_traffic_threshold: usize = 1;
    /// let mut detector = AnomalyDetector::new(movement_thresh, max_stationary_frames, min_traffic_threshold);
    /// ```
    pub fn new(movement_thresh: f32, max_stationary_frames: usize, min_traffic_threshold: usize) -> Self {
        AnomalyDetector {
            movement_thresh,
            max_stationary_frames,
            min_traffic_threshold,
            histories: HashMap::new(),
        }
    }
    pub fn get_movement_thresh(&self) -> f32 {
        self.movement_thresh
    }
    pub fn get_max_stationary_frames(&self) -> usize {
        self.max_stationary_frames
    }
    pub fn get_min_traffic_threshold(&self) -> usize {
        self.min_traffic_threshold
    }

    /// Analyzes one frame and returns its findings joined with `"; "`, or an
    /// empty string when nothing is anomalous.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use mot_anomaly::anomaly::AnomalyDetector;
    /// use mot_anomaly::mot::Detection;
    /// use mot_anomaly::utils::BBox;
    /// let mut detector = AnomalyDetector::default();
    /// let frame = vec![Detection::new("dog", 0.8, BBox::new(220, 150, 260, 200))];
    /// let report = detector.analyze(&frame, &BTreeMap::new());
    /// assert_eq!(report, "Unexpected object(s): dog; Low traffic volume");
    /// ```
    pub fn analyze(&mut self, detections: &[Detection], tracks: &BTreeMap<TrackId, Point>) -> String {
        self.findings(detections, tracks).iter().join("; ")
    }

    /// Same as [`AnomalyDetector::analyze`] but keeps the findings structured.
    pub fn findings(&mut self, detections: &[Detection], tracks: &BTreeMap<TrackId, Point>) -> Vec<Finding> {
        let mut findings = Vec::new();

        let mut vehicle_count = 0;
        let mut unexpected: BTreeSet<&str> = BTreeSet::new();
        for detection in detections {
            if is_vehicle(&detection.class_name) {
                vehicle_count += 1;
            } else {
                unexpected.insert(detection.class_name.as_str());
            }
        }

        let window = self.max_stationary_frames;
        for (id, center) in tracks {
            let history = self
                .histories
                .entry(*id)
                .or_insert_with(|| PositionHistory::new(window));
            history.push(*center);
            if window == 0 || history.len() != window {
                continue;
            }
            if let Some(displacement) = history.displacement() {
                trace!("Track {} moved {:.2}px over {} frames", id, displacement, window);
                if displacement < self.movement_thresh {
                    findings.push(Finding::Stopped { id: *id, at: *center });
                }
            }
        }

        if !unexpected.is_empty() {
            findings.push(Finding::UnexpectedObjects {
                classes: unexpected.into_iter().map(String::from).collect(),
            });
        }
        if vehicle_count < self.min_traffic_threshold {
            findings.push(Finding::LowTraffic);
        }
        findings
    }

    /// Drops the history of an identifier the tracker has evicted.
    pub fn forget(&mut self, id: TrackId) -> bool {
        self.histories.remove(&id).is_some()
    }
    pub fn forget_all(&mut self, ids: &[TrackId]) {
        for id in ids {
            self.forget(*id);
        }
    }
    pub fn history(&self, id: TrackId) -> Option<&PositionHistory> {
        self.histories.get(&id)
    }
    /// Number of identifiers with a stored history
    pub fn tracked_histories(&self) -> usize {
        self.histories.len()
    }
}

impl fmt::Display for AnomalyDetector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Movement threshold: {}\n\tStationary frames: {}\n\tMinimum traffic: {}",
            self.movement_thresh, self.max_stationary_frames, self.min_traffic_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mot::test_data::{det, det_at, get_parking_data};
    use crate::mot::CentroidTracker;
    use proptest::prelude::*;

    fn single(id: TrackId, x: i32, y: i32) -> BTreeMap<TrackId, Point> {
        BTreeMap::from([(id, Point::new(x, y))])
    }

    #[test]
    fn test_jitter_reports_stop_on_window_fill() {
        let mut detector = AnomalyDetector::new(5.0, 3, 1);
        let car = vec![det_at("car", 100, 150)];
        assert_eq!(detector.analyze(&car, &single(0, 100, 150)), "");
        assert_eq!(detector.analyze(&car, &single(0, 101, 149)), "");
        assert_eq!(
            detector.analyze(&car, &single(0, 100, 151)),
            "Object 0 appears stopped at (100, 151)"
        );
    }

    #[test]
    fn test_moving_object_is_not_stopped() {
        let mut detector = AnomalyDetector::new(5.0, 3, 1);
        let car = vec![det_at("car", 100, 150)];
        detector.analyze(&car, &single(0, 100, 150));
        detector.analyze(&car, &single(0, 101, 149));
        assert_eq!(detector.analyze(&car, &single(0, 200, 150)), "");
    }

    #[test]
    fn test_window_compares_endpoints_only() {
        let mut detector = AnomalyDetector::new(5.0, 3, 0);
        // Big excursion in the middle, but the window starts and ends in place
        detector.analyze(&[], &single(7, 10, 10));
        detector.analyze(&[], &single(7, 90, 90));
        assert_eq!(detector.analyze(&[], &single(7, 12, 10)), "Object 7 appears stopped at (12, 10)");
        // Window slides: oldest is now (90, 90)
        assert_eq!(detector.analyze(&[], &single(7, 12, 10)), "");
        assert_eq!(detector.history(7).map(|h| h.len()), Some(3));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = AnomalyDetector::new(5.0, 2, 0);
        detector.analyze(&[], &single(1, 0, 0));
        assert_eq!(detector.analyze(&[], &single(1, 3, 4)), "");
    }

    #[test]
    fn test_low_traffic() {
        let mut detector = AnomalyDetector::new(5.0, 3, 1);
        assert_eq!(detector.analyze(&[], &BTreeMap::new()), "Low traffic volume");
        let people = vec![det_at("person", 10, 10)];
        assert_eq!(
            detector.analyze(&people, &BTreeMap::new()),
            "Unexpected object(s): person; Low traffic volume"
        );
        let mut busy = AnomalyDetector::new(5.0, 3, 3);
        let two_cars = vec![det_at("car", 10, 10), det_at("van", 50, 10)];
        assert_eq!(busy.analyze(&two_cars, &BTreeMap::new()), "Low traffic volume");
    }

    #[test]
    fn test_unexpected_classes_are_distinct_and_sorted() {
        let mut detector = AnomalyDetector::new(5.0, 3, 1);
        let frame = vec![
            det_at("person", 10, 10),
            det_at("dog", 20, 10),
            det_at("car", 30, 10),
            det_at("person", 40, 10),
        ];
        assert_eq!(
            detector.analyze(&frame, &BTreeMap::new()),
            "Unexpected object(s): dog, person"
        );
        let findings = detector.findings(&frame, &BTreeMap::new());
        assert_eq!(
            findings,
            vec![Finding::UnexpectedObjects {
                classes: vec!["dog".to_string(), "person".to_string()]
            }]
        );
    }

    #[test]
    fn test_finding_order() {
        let mut detector = AnomalyDetector::new(5.0, 1, 1);
        let frame = vec![det_at("dog", 10, 10)];
        let tracks = BTreeMap::from([(2, Point::new(5, 5)), (0, Point::new(1, 1))]);
        assert_eq!(
            detector.analyze(&frame, &tracks),
            "Object 0 appears stopped at (1, 1); Object 2 appears stopped at (5, 5); Unexpected object(s): dog; Low traffic volume"
        );
    }

    #[test]
    fn test_zero_window_never_stops() {
        let mut detector = AnomalyDetector::new(5.0, 0, 0);
        for _ in 0..5 {
            assert_eq!(detector.analyze(&[], &single(0, 1, 1)), "");
        }
        assert_eq!(detector.history(0).map(|h| h.len()), Some(1));
    }

    #[test]
    fn test_forget() {
        let mut detector = AnomalyDetector::new(5.0, 3, 0);
        detector.analyze(&[], &BTreeMap::from([(0, Point::new(1, 1)), (1, Point::new(9, 9))]));
        assert_eq!(detector.tracked_histories(), 2);
        assert!(detector.forget(0));
        assert!(!detector.forget(0));
        detector.forget_all(&[1, 5]);
        assert_eq!(detector.tracked_histories(), 0);
        assert!(detector.history(1).is_none());
    }

    #[test]
    fn test_with_tracker_parking_sequence() {
        let mut mot = CentroidTracker::default();
        let mut detector = AnomalyDetector::default();
        let reports: Vec<String> = get_parking_data()
            .iter()
            .map(|frame| {
                let tracks = mot.update(frame);
                detector.analyze(frame, &tracks)
            })
            .collect();
        assert_eq!(
            reports,
            vec![
                "".to_string(),
                "".to_string(),
                // Drifted ~6px over the window, just above the 5px threshold
                "".to_string(),
                // The dog is close enough to take over track 0
                "Unexpected object(s): dog; Low traffic volume".to_string(),
            ]
        );
    }

    #[test]
    fn test_dog_always_reported() {
        let mut detector = AnomalyDetector::new(5.0, 3, 1);
        let frame = vec![det("car", 0, 0, 10, 10), det("dog", 220, 150, 260, 200), det("bus", 50, 50, 90, 90)];
        for _ in 0..3 {
            assert!(detector.analyze(&frame, &BTreeMap::new()).contains("Unexpected object(s): dog"));
        }
    }

    proptest! {
        #[test]
        fn prop_history_is_bounded(
            window in 1usize..6,
            positions in prop::collection::vec((0..5u64, 0..100i32, 0..100i32), 1..60),
        ) {
            let mut detector = AnomalyDetector::new(5.0, window, 1);
            for (id, x, y) in positions {
                detector.analyze(&[], &single(id, x, y));
                prop_assert!(detector.history(id).unwrap().len() <= window);
            }
        }
    }
}
