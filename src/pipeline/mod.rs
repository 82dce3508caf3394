//! Export contents of `pipeline` folder
mod config;
mod stream;

pub use self::{
    config::*,
    stream::*,
};
