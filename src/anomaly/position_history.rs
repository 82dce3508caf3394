use std::collections::VecDeque;

use crate::utils::{euclidean_distance, Point};

/// Most recent centroids of one tracked object, oldest first.
///
/// Holds at most `capacity` entries; pushing onto a full history drops the
/// oldest one.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionHistory {
    points: VecDeque<Point>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PositionHistory {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }
    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn is_full(&self) -> bool {
        self.points.len() == self.capacity
    }
    pub fn oldest(&self) -> Option<&Point> {
        self.points.front()
    }
    pub fn newest(&self) -> Option<&Point> {
        self.points.back()
    }
    /// Straight-line distance between the oldest and the newest entry.
    pub fn displacement(&self) -> Option<f32> {
        match (self.oldest(), self.newest()) {
            (Some(a), Some(b)) => Some(euclidean_distance(a, b)),
            _ => None,
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_drops_oldest() {
        let mut history = PositionHistory::new(3);
        for x in 0..5 {
            history.push(Point::new(x, 0));
            assert!(history.len() <= 3);
        }
        assert!(history.is_full());
        let xs: Vec<i32> = history.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2, 3, 4]);
        assert_eq!(history.displacement(), Some(2.0));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = PositionHistory::new(0);
        assert_eq!(history.capacity(), 1);
        history.push(Point::new(1, 1));
        history.push(Point::new(2, 2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.newest(), Some(&Point::new(2, 2)));
    }

    #[test]
    fn test_empty() {
        let history = PositionHistory::new(5);
        assert!(history.is_empty());
        assert!(!history.is_full());
        assert_eq!(history.displacement(), None);
    }
}
