//! Core domain models for the engine
//!
//! Steps, the pipeline that owns them, and the rules deciding which
//! destination instance a step works on.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod resolution;
pub mod step;
pub mod typed;

pub use config::{Configuration, EngineSettings, InstanceFactory, TypeRequest};
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use resolution::{DestinationPolicy, InitialDestinationFactory, StepBinding};
pub use step::{ConditionalStep, FnStep, Predicate, Step, StepFn, TransformAction};
pub use typed::{Typed, TypedMulti, TypedMultiStep, TypedStep};
