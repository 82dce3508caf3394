use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::mot::TrackId;
use crate::utils::Point;

/// Class labels counted as traffic
pub const VEHICLE_CLASSES: [&str; 6] = ["car", "truck", "bus", "motorcycle", "bicycle", "van"];

pub fn is_vehicle(class_name: &str) -> bool {
    VEHICLE_CLASSES.contains(&class_name)
}

/// One anomaly reported for a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The track barely moved across the whole history window
    Stopped { id: TrackId, at: Point },
    /// Distinct non-vehicle class names seen in the frame, sorted
    UnexpectedObjects { classes: Vec<String> },
    LowTraffic,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Finding::Stopped { id, at } => write!(f, "Object {} appears stopped at {}", id, at),
            Finding::UnexpectedObjects { classes } => {
                write!(f, "Unexpected object(s): {}", classes.iter().join(", "))
            }
            Finding::LowTraffic => write!(f, "Low traffic volume"),
        }
    }
}
