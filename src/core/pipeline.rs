//! Pipeline domain model
//!
//! A pipeline owns an ordered list of steps plus the settings used to resolve
//! destinations. Attaching a step points its binding at the pipeline's
//! [`DestinationPolicy`]; removing it clears that back-reference again.

use crate::core::{
    config::Configuration,
    error::PipelineError,
    resolution::DestinationPolicy,
    step::{ConditionalStep, FnStep, Step},
};
use crate::execution::{FanOut, Linear};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// An ordered transformation pipeline from `S` to `D` with context `C`
pub struct Pipeline<S, D: 'static, C = ()> {
    policy: Rc<DestinationPolicy<D, C>>,
    steps: Vec<Box<dyn Step<S, D, C>>>,
}

impl<S: 'static, D: Clone + Default + 'static, C: 'static> Pipeline<S, D, C> {
    /// Create a pipeline using a snapshot of the process default configuration
    pub fn new() -> Self {
        Self::with_configuration(Configuration::process_default())
    }

    pub fn with_configuration(configuration: Configuration) -> Self {
        Self::from_parts(configuration, Some(D::default))
    }
}

impl<S: 'static, D: Clone + Default + 'static, C: 'static> Default for Pipeline<S, D, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, D: Clone + 'static, C: 'static> Pipeline<S, D, C> {
    /// Create a pipeline for a destination type without a default constructor.
    ///
    /// Auto-creation then requires an instance factory.
    pub fn without_default(configuration: Configuration) -> Self {
        Self::from_parts(configuration, None)
    }

    fn from_parts(configuration: Configuration, constructor: Option<fn() -> D>) -> Self {
        Self {
            policy: Rc::new(DestinationPolicy::new(configuration, constructor)),
            steps: Vec::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        self.policy.configuration()
    }

    pub fn policy(&self) -> &Rc<DestinationPolicy<D, C>> {
        &self.policy
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Box<dyn Step<S, D, C>>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step and attach it to this pipeline
    pub fn add_step(&mut self, mut step: Box<dyn Step<S, D, C>>) {
        step.attach(Some(Rc::downgrade(&self.policy)));
        debug!("Attached step {} at position {}", step.name(), self.steps.len());
        self.steps.push(step);
    }

    /// Attach `step` as an isolated branch.
    ///
    /// `keep_initial_destination` defaults to the inverse of the
    /// configuration's `isolate_initial_destination`.
    pub fn add_isolated_step(&mut self, mut step: Box<dyn Step<S, D, C>>, keep_initial_destination: Option<bool>) {
        let keep = keep_initial_destination
            .unwrap_or(!self.configuration().isolate_initial_destination);
        step.binding_mut().set_isolation(true, keep);
        self.add_step(step);
    }

    /// Remove the step at `index` and detach it
    pub fn remove_step(&mut self, index: usize) -> Result<Box<dyn Step<S, D, C>>, PipelineError> {
        if index >= self.steps.len() {
            return Err(PipelineError::StepIndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }

        let mut step = self.steps.remove(index);
        step.attach(None);
        debug!("Detached step {} from position {}", step.name(), index);
        Ok(step)
    }

    /// Check whether `step` is attached to this pipeline
    pub fn is_attached(&self, step: &dyn Step<S, D, C>) -> bool {
        step.binding().is_bound_to(&self.policy)
    }

    /// Replace the configuration; attached steps follow the change
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.policy = Rc::new(self.policy.with_configuration(configuration));
        self.reattach();
    }

    /// Set the factory producing the initial destination of every run
    pub fn set_initial_destination<F>(&mut self, factory: F)
    where
        F: Fn(&C) -> Option<D> + 'static,
    {
        self.policy = Rc::new(self.policy.with_initial_destination(Rc::new(factory)));
        self.reattach();
    }

    fn reattach(&mut self) {
        let owner = Rc::downgrade(&self.policy);
        for step in &mut self.steps {
            step.attach(Some(owner.clone()));
        }
    }

    /// Resolve the destination a run starts from
    pub(crate) fn resolve(&self, context: &C, destination: Option<D>) -> Result<Option<D>, PipelineError> {
        self.policy.resolve(context, destination, false)
    }

    /// Append a plain function step
    pub fn then<F>(self, action: F) -> Self
    where
        F: Fn(&S, Option<D>, &C) -> Option<D> + 'static,
    {
        self.apply(FnStep::new(action))
    }

    /// Append a function step that only runs when `condition` holds
    pub fn then_if<P, F>(self, condition: P, action: F) -> Self
    where
        P: Fn(&S, Option<&D>, &C) -> bool + 'static,
        F: Fn(&S, Option<D>, &C) -> Option<D> + 'static,
    {
        self.apply(ConditionalStep::new(condition, action))
    }

    pub fn apply<T>(mut self, step: T) -> Self
    where
        T: Step<S, D, C> + 'static,
    {
        self.add_step(Box::new(step));
        self
    }

    /// Append a step whose results are reported as a separate branch
    pub fn apply_isolated<T>(mut self, step: T, keep_initial_destination: Option<bool>) -> Self
    where
        T: Step<S, D, C> + 'static,
    {
        self.add_isolated_step(Box::new(step), keep_initial_destination);
        self
    }

    /// Append `step`, run only when `condition` holds
    pub fn apply_if<P, T>(self, condition: P, step: T) -> Self
    where
        P: Fn(&S, Option<&D>, &C) -> bool + 'static,
        T: Step<S, D, C> + 'static,
    {
        self.apply(ConditionalStep::wrapping(condition, Box::new(step)))
    }

    /// Append `step` as an isolated branch, run only when `condition` holds
    pub fn apply_if_isolated<P, T>(self, condition: P, step: T) -> Self
    where
        P: Fn(&S, Option<&D>, &C) -> bool + 'static,
        T: Step<S, D, C> + 'static,
    {
        self.apply(ConditionalStep::wrapping(condition, Box::new(step)).isolated())
    }

    pub fn configure(mut self, configuration: Configuration) -> Self {
        self.set_configuration(configuration);
        self
    }

    /// Start every run from a copy of `value`
    pub fn initial_value(mut self, value: D) -> Self {
        self.set_initial_destination(move |_| Some(value.clone()));
        self
    }

    pub fn initial_destination<F>(mut self, factory: F) -> Self
    where
        F: Fn(&C) -> Option<D> + 'static,
    {
        self.set_initial_destination(factory);
        self
    }

    /// Finish with the single-result executor
    pub fn build(self) -> Linear<S, D, C> {
        Linear::new(self)
    }

    /// Finish with the fan-out executor
    pub fn build_fan_out(self) -> FanOut<S, D, C> {
        FanOut::new(self)
    }
}

impl<S, D: 'static, C> fmt::Debug for Pipeline<S, D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|step| step.name()).collect();
        f.debug_struct("Pipeline")
            .field("policy", &self.policy)
            .field("steps", &names)
            .finish()
    }
}
