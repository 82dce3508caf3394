//! Export contents of `anomaly` folder
mod anomaly_detector;
mod finding;
mod position_history;

pub use self::{
    anomaly_detector::*,
    finding::*,
    position_history::*,
};
