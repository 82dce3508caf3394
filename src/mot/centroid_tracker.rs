use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::mot::Detection;
use crate::utils::{euclidean_distance, Point};

/// Identifier of a tracked object. Assigned monotonically, never reused.
pub type TrackId = u64;

/// How detections claim tracks during one `update` call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingAlgorithm {
    /// Every detection takes its nearest track, even one already claimed
    /// earlier in the same call.
    #[default]
    Nearest,
    /// A track claimed in this call is no longer a candidate for later
    /// detections of the same call, giving one-to-one pairing.
    Exclusive,
}

/// Greedy nearest-centroid multi-object tracker (MOT)
///
/// Identities are persistent integers. A track that goes unmatched for more
/// than `max_lost` consecutive updates is evicted and its identifier retired.
pub struct CentroidTracker {
    // Association radius (in pixels). Default 300.0
    max_distance: f32,
    // Max consecutive updates without a match before eviction. Default 5
    max_lost: usize,
    algorithm: MatchingAlgorithm,
    next_id: TrackId,
    // Live tracks. Ids are inserted in increasing order so key order is insertion order
    objects: BTreeMap<TrackId, Point>,
    lost: BTreeMap<TrackId, usize>,
    // Evicted by the most recent update
    removed: Vec<TrackId>,
}

impl Default for CentroidTracker {
    /// Creates default instance of CentroidTracker
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::mot::CentroidTracker;
    /// let mut tracker = CentroidTracker::default();
    /// ```
    fn default() -> Self {
        CentroidTracker::new(300.0, 5)
    }
}

impl CentroidTracker {
    /// Creates new instance of CentroidTracker
    ///
    /// Basic usage:
    ///
    /// ```
    /// use mot_anomaly::mot::CentroidTracker;
    /// let max_distance: f32 = 100.0;
    /// let max_lost: usize = 2;
    /// let mut tracker = CentroidTracker::new(max_distance, max_lost);
    /// ```
    pub fn new(max_distance: f32, max_lost: usize) -> Self {
        CentroidTracker {
            max_distance,
            max_lost,
            algorithm: MatchingAlgorithm::default(),
            next_id: 0,
            objects: BTreeMap::new(),
            lost: BTreeMap::new(),
            removed: Vec::new(),
        }
    }
    /// Switches association strategy
    ///
    /// ```
    /// use mot_anomaly::mot::{CentroidTracker, MatchingAlgorithm};
    /// let tracker = CentroidTracker::new(100.0, 2).with_algorithm(MatchingAlgorithm::Exclusive);
    /// assert_eq!(tracker.get_algorithm(), MatchingAlgorithm::Exclusive);
    /// ```
    pub fn with_algorithm(mut self, algorithm: MatchingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
    pub fn get_algorithm(&self) -> MatchingAlgorithm {
        self.algorithm
    }
    pub fn get_max_distance(&self) -> f32 {
        self.max_distance
    }
    pub fn get_max_lost(&self) -> usize {
        self.max_lost
    }
    /// Identifier the next new track will receive
    pub fn next_id(&self) -> TrackId {
        self.next_id
    }
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
    pub fn centroid(&self, id: TrackId) -> Option<Point> {
        self.objects.get(&id).copied()
    }
    /// Consecutive updates the track went unmatched. `None` once evicted.
    pub fn lost_count(&self, id: TrackId) -> Option<usize> {
        self.lost.get(&id).copied()
    }
    /// Identifiers evicted by the most recent `update`, in increasing order.
    pub fn removed(&self) -> &[TrackId] {
        &self.removed
    }

    /// Associates the frame's detections to tracks and returns every live
    /// identifier with its current centroid.
    ///
    /// Distances are measured against track positions as they were when the
    /// call started. Ties go to the track that was registered first.
    ///
    /// ```
    /// use mot_anomaly::mot::{CentroidTracker, Detection};
    /// use mot_anomaly::utils::{BBox, Point};
    /// let mut tracker = CentroidTracker::default();
    /// let tracks = tracker.update(&[Detection::new("car", 0.9, BBox::new(100, 120, 200, 180))]);
    /// assert_eq!(tracks.get(&0), Some(&Point::new(150, 150)));
    /// let tracks = tracker.update(&[Detection::new("car", 0.9, BBox::new(105, 122, 205, 182))]);
    /// assert_eq!(tracks.get(&0), Some(&Point::new(155, 152)));
    /// ```
    pub fn update(&mut self, detections: &[Detection]) -> BTreeMap<TrackId, Point> {
        self.removed.clear();
        let centroids: Vec<Point> = detections.iter().map(|d| d.get_center()).collect();

        if self.objects.is_empty() {
            for centroid in centroids {
                self.register(centroid);
            }
            return self.objects.clone();
        }

        let snapshot: Vec<(TrackId, Point)> = self.objects.iter().map(|(id, c)| (*id, *c)).collect();
        // Matched or created during this call
        let mut touched: HashSet<TrackId> = HashSet::with_capacity(centroids.len());
        let mut claimed: HashSet<TrackId> = HashSet::new();

        for centroid in centroids {
            let exclude = match self.algorithm {
                MatchingAlgorithm::Nearest => None,
                MatchingAlgorithm::Exclusive => Some(&claimed),
            };
            match nearest(&snapshot, &centroid, exclude) {
                Some((id, distance)) if distance < self.max_distance => {
                    trace!("Track {} matched at {} (distance {:.2})", id, centroid, distance);
                    self.objects.insert(id, centroid);
                    self.lost.insert(id, 0);
                    touched.insert(id);
                    claimed.insert(id);
                }
                _ => {
                    let id = self.register(centroid);
                    touched.insert(id);
                }
            }
        }

        // Age unmatched tracks and evict the ones lost for too long
        let max_lost = self.max_lost;
        let removed = &mut self.removed;
        self.lost.retain(|id, lost| {
            if touched.contains(id) {
                return true;
            }
            *lost += 1;
            let delete = *lost > max_lost;
            if delete {
                removed.push(*id);
            }
            !delete
        });
        for id in self.removed.iter() {
            self.objects.remove(id);
            debug!("Track {} removed after {} frames without a match", id, max_lost + 1);
        }

        self.objects.clone()
    }

    fn register(&mut self, centroid: Point) -> TrackId {
        let id = self.next_id;
        self.objects.insert(id, centroid);
        self.lost.insert(id, 0);
        self.next_id += 1;
        debug!("Track {} registered at {}", id, centroid);
        id
    }
}

// First minimum in scan order wins
fn nearest(
    candidates: &[(TrackId, Point)],
    centroid: &Point,
    exclude: Option<&HashSet<TrackId>>,
) -> Option<(TrackId, f32)> {
    let mut best: Option<(TrackId, f32)> = None;
    for (id, position) in candidates {
        if exclude.map_or(false, |ex| ex.contains(id)) {
            continue;
        }
        let distance = euclidean_distance(centroid, position);
        match best {
            Some((_, min_distance)) if distance >= min_distance => {}
            _ => best = Some((*id, distance)),
        }
    }
    best
}

impl fmt::Display for CentroidTracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Maximum distance: {}\n\tMaximum lost: {}\n\tMatching: {:?}",
            self.max_distance, self.max_lost, self.algorithm
        )
    }
}
