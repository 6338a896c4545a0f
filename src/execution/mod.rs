//! Pipeline executors

pub mod fan_out;
pub mod group;
pub mod linear;

pub use fan_out::{FanOut, Outputs};
pub use group::GroupStep;
pub use linear::Linear;
