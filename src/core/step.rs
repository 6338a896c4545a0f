//! Step abstraction and the leaf step kinds

use crate::core::{
    error::PipelineError,
    resolution::{DestinationPolicy, StepBinding},
};
use serde::{Deserialize, Serialize};
use std::rc::Weak;

/// Leaf transformation: `(source, destination, context) -> destination`
pub type StepFn<S, D, C> = Box<dyn Fn(&S, Option<D>, &C) -> Option<D>>;

/// Condition evaluated before a conditional step runs
pub type Predicate<S, D, C> = Box<dyn Fn(&S, Option<&D>, &C) -> bool>;

/// A single unit of a transformation pipeline.
///
/// Returning `Ok(None)` from [`Step::transform`] stops the branch the step
/// was applied to; it is not an error.
pub trait Step<S, D: 'static, C> {
    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn binding(&self) -> &StepBinding<D, C>;

    fn binding_mut(&mut self) -> &mut StepBinding<D, C>;

    /// Point this step (and anything it wraps) at its owning pipeline
    fn attach(&mut self, owner: Option<Weak<DestinationPolicy<D, C>>>) {
        self.binding_mut().bind(owner);
    }

    /// Transform `source` into (a possibly replaced) `destination`
    fn transform(&self, source: &S, destination: Option<D>, context: &C) -> Result<Option<D>, PipelineError>;

    /// Whether this step produces its results through [`Step::transform_multi`]
    fn is_multi(&self) -> bool {
        false
    }

    /// Produce zero, one or many destinations
    fn transform_multi(
        &self,
        source: &S,
        destination: Option<D>,
        context: &C,
    ) -> Result<Vec<Option<D>>, PipelineError> {
        Ok(vec![self.transform(source, destination, context)?])
    }

    fn is_isolated(&self) -> bool {
        self.binding().is_isolated()
    }

    fn keeps_initial_destination(&self) -> bool {
        self.binding().keeps_initial_destination()
    }
}

/// What a typed step wants to do with the current destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformAction {
    /// Run the transformation
    #[default]
    Transform,
    /// Skip the transformation but keep the flow going
    PassThrough,
    /// Stop the flow for this destination
    #[serde(rename = "break", alias = "break_transformation", other)]
    BreakTransformation,
}

impl From<i32> for TransformAction {
    /// Unknown codes stop the flow rather than failing
    fn from(code: i32) -> Self {
        match code {
            0 => TransformAction::Transform,
            1 => TransformAction::PassThrough,
            _ => TransformAction::BreakTransformation,
        }
    }
}

/// Wraps a plain function
pub struct FnStep<S, D: 'static, C> {
    name: Option<String>,
    action: StepFn<S, D, C>,
    binding: StepBinding<D, C>,
}

impl<S, D: 'static, C> FnStep<S, D, C> {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&S, Option<D>, &C) -> Option<D> + 'static,
    {
        Self {
            name: None,
            action: Box::new(action),
            binding: StepBinding::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<S, D: 'static, C> Step<S, D, C> for FnStep<S, D, C> {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("fn")
    }

    fn binding(&self) -> &StepBinding<D, C> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut StepBinding<D, C> {
        &mut self.binding
    }

    fn transform(&self, source: &S, destination: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        Ok((self.action)(source, destination, context))
    }
}

enum Branch<S, D: 'static, C> {
    Action(StepFn<S, D, C>),
    Step(Box<dyn Step<S, D, C>>),
}

/// Runs an action or a wrapped step only when its predicate holds.
///
/// When the predicate is false the destination passes through untouched.
/// Otherwise the destination is resolved first, so an isolated conditional
/// step works on its own fresh instance.
pub struct ConditionalStep<S, D: 'static, C> {
    condition: Predicate<S, D, C>,
    branch: Branch<S, D, C>,
    binding: StepBinding<D, C>,
}

impl<S: 'static, D: 'static, C: 'static> ConditionalStep<S, D, C> {
    pub fn new<P, F>(condition: P, action: F) -> Self
    where
        P: Fn(&S, Option<&D>, &C) -> bool + 'static,
        F: Fn(&S, Option<D>, &C) -> Option<D> + 'static,
    {
        Self {
            condition: Box::new(condition),
            branch: Branch::Action(Box::new(action)),
            binding: StepBinding::new(),
        }
    }

    pub fn wrapping<P>(condition: P, step: Box<dyn Step<S, D, C>>) -> Self
    where
        P: Fn(&S, Option<&D>, &C) -> bool + 'static,
    {
        Self {
            condition: Box::new(condition),
            branch: Branch::Step(step),
            binding: StepBinding::new(),
        }
    }

    /// Report results as a separate branch and always work on a fresh destination
    pub fn isolated(mut self) -> Self {
        self.binding.set_isolation(true, false);
        self
    }
}

impl<S, D: 'static, C> Step<S, D, C> for ConditionalStep<S, D, C> {
    fn name(&self) -> &str {
        match &self.branch {
            Branch::Action(_) => "conditional",
            Branch::Step(inner) => inner.name(),
        }
    }

    fn binding(&self) -> &StepBinding<D, C> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut StepBinding<D, C> {
        &mut self.binding
    }

    fn attach(&mut self, owner: Option<Weak<DestinationPolicy<D, C>>>) {
        if let Branch::Step(inner) = &mut self.branch {
            inner.attach(owner.clone());
        }
        self.binding.bind(owner);
    }

    fn transform(&self, source: &S, destination: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        if !(self.condition)(source, destination.as_ref(), context) {
            return Ok(destination);
        }

        let destination = self.binding.resolve(context, destination)?;
        match &self.branch {
            Branch::Action(action) => Ok(action(source, destination, context)),
            Branch::Step(inner) => inner.transform(source, destination, context),
        }
    }
}
