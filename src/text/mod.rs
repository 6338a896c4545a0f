//! Declarative text pipelines
//!
//! YAML-described pipelines over `String`. Each step is one text operation,
//! optionally isolated, gated by a `when` condition, or overridden by an
//! `action`.

pub mod condition;
pub mod config;
pub mod context;
pub mod ops;

pub use condition::{Condition, ConditionConfig, ConditionPattern, ConditionTarget};
pub use config::{StepConfig, TextPipeline, TextPipelineConfig};
pub use context::TextContext;
pub use ops::{TextMultiStep, TextOp, TextStep};
