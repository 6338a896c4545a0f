//! stepwise - an ordered, fan-out capable transformation pipeline engine

pub mod cli;
pub mod core;
pub mod execution;
pub mod text;

// Re-export commonly used types
pub use crate::core::{Configuration, FnStep, Pipeline, PipelineError, Step, TransformAction, TypedMultiStep, TypedStep};
pub use crate::execution::{FanOut, GroupStep, Linear, Outputs};
pub use crate::text::{TextContext, TextPipelineConfig};
