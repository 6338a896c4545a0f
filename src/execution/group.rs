//! Composite steps built from finished pipelines

use crate::core::{error::PipelineError, pipeline::Pipeline, resolution::StepBinding, step::Step};
use crate::execution::{FanOut, Linear};

enum Executor<S, D: 'static, C> {
    Linear(Linear<S, D, C>),
    FanOut(FanOut<S, D, C>),
}

/// Runs a nested pipeline as a single step of an outer one.
///
/// The destination handed to the group becomes the nested run's initial
/// destination. A fan-out group reports every nested result through the
/// multi-result contract; its single-result view is the last of them.
pub struct GroupStep<S, D: 'static, C> {
    name: String,
    executor: Executor<S, D, C>,
    binding: StepBinding<D, C>,
}

impl<S: 'static, D: Clone + 'static, C: 'static> GroupStep<S, D, C> {
    pub fn linear(pipeline: Pipeline<S, D, C>) -> Self {
        Self {
            name: "group".to_string(),
            executor: Executor::Linear(pipeline.build()),
            binding: StepBinding::new(),
        }
    }

    pub fn fan_out(pipeline: Pipeline<S, D, C>) -> Self {
        Self {
            name: "fan-out group".to_string(),
            executor: Executor::FanOut(pipeline.build_fan_out()),
            binding: StepBinding::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn pipeline(&self) -> &Pipeline<S, D, C> {
        match &self.executor {
            Executor::Linear(linear) => linear.pipeline(),
            Executor::FanOut(fan_out) => fan_out.pipeline(),
        }
    }
}

impl<S: 'static, D: Clone + 'static, C: 'static> Step<S, D, C> for GroupStep<S, D, C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn binding(&self) -> &StepBinding<D, C> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut StepBinding<D, C> {
        &mut self.binding
    }

    fn transform(&self, source: &S, destination: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        match &self.executor {
            Executor::Linear(linear) => linear.transform(source, destination, context),
            Executor::FanOut(fan_out) => fan_out.transform(source, destination, context),
        }
    }

    fn is_multi(&self) -> bool {
        matches!(self.executor, Executor::FanOut(_))
    }

    fn transform_multi(
        &self,
        source: &S,
        destination: Option<D>,
        context: &C,
    ) -> Result<Vec<Option<D>>, PipelineError> {
        match &self.executor {
            Executor::Linear(linear) => Ok(vec![linear.transform(source, destination, context)?]),
            Executor::FanOut(fan_out) => fan_out
                .transform_multi(source, destination, context)
                .map(|output| output.map(Some))
                .collect(),
        }
    }
}
