//! Export contents of `mot` folder
mod centroid_tracker;
mod detection;
mod mot_errors;

#[cfg(test)]
pub(crate) mod test_data;

pub use self::{
    centroid_tracker::*,
    detection::*,
    mot_errors::*,
};
