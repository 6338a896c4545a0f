//! Engine error types

use thiserror::Error;

/// Errors raised by pipelines, steps and executors.
///
/// A step returning no destination is not an error: it is the normal
/// "stop this branch" signal and never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Step '{step}' only supports multi-result transformation")]
    Unsupported { step: String },

    #[error("Step index {index} is out of range (pipeline has {len} steps)")]
    StepIndexOutOfRange { index: usize, len: usize },

    #[error("Instance factory produced a value that is not a {expected}")]
    InstanceType { expected: &'static str },

    #[error("No way to construct {type_name}: configure an instance factory or disable auto-creation")]
    NoConstructor { type_name: &'static str },

    #[error("Invalid pipeline definition: {0}")]
    Config(String),
}
