//! Typed steps with a `can_transform` gate

use crate::core::{
    error::PipelineError,
    resolution::StepBinding,
    step::{Step, TransformAction},
};
use std::marker::PhantomData;

/// Single-result step logic
pub trait TypedStep<S, D, C> {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Decide whether [`TypedStep::apply`] runs. Defaults to `Transform`.
    fn can_transform(&self, _source: &S, _destination: Option<&D>, _context: &C) -> TransformAction {
        TransformAction::Transform
    }

    fn apply(&self, source: &S, destination: Option<D>, context: &C) -> Option<D>;
}

/// Multi-result step logic
pub trait TypedMultiStep<S, D, C> {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Decide whether [`TypedMultiStep::apply_multi`] runs. Defaults to `Transform`.
    fn can_transform(&self, _source: &S, _destination: Option<&D>, _context: &C) -> TransformAction {
        TransformAction::Transform
    }

    fn apply_multi(&self, source: &S, destination: Option<D>, context: &C) -> Vec<Option<D>>;
}

/// Adapts a [`TypedStep`] into a pipeline step
pub struct Typed<T, S, D: 'static, C> {
    inner: T,
    binding: StepBinding<D, C>,
    _source: PhantomData<fn(&S)>,
}

impl<T, S, D: 'static, C> Typed<T, S, D, C>
where
    T: TypedStep<S, D, C>,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            binding: StepBinding::new(),
            _source: PhantomData,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T, S, D: 'static, C> Step<S, D, C> for Typed<T, S, D, C>
where
    T: TypedStep<S, D, C>,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn binding(&self) -> &StepBinding<D, C> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut StepBinding<D, C> {
        &mut self.binding
    }

    fn transform(&self, source: &S, destination: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        match self.inner.can_transform(source, destination.as_ref(), context) {
            TransformAction::Transform => Ok(self.inner.apply(source, destination, context)),
            TransformAction::PassThrough => Ok(destination),
            TransformAction::BreakTransformation => Ok(None),
        }
    }
}

/// Adapts a [`TypedMultiStep`] into a pipeline step.
///
/// Only the multi-result contract is available; calling
/// [`Step::transform`] fails with [`PipelineError::Unsupported`].
pub struct TypedMulti<T, S, D: 'static, C> {
    inner: T,
    binding: StepBinding<D, C>,
    _source: PhantomData<fn(&S)>,
}

impl<T, S, D: 'static, C> TypedMulti<T, S, D, C>
where
    T: TypedMultiStep<S, D, C>,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            binding: StepBinding::new(),
            _source: PhantomData,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T, S, D: 'static, C> Step<S, D, C> for TypedMulti<T, S, D, C>
where
    T: TypedMultiStep<S, D, C>,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn binding(&self) -> &StepBinding<D, C> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut StepBinding<D, C> {
        &mut self.binding
    }

    fn transform(&self, _source: &S, _destination: Option<D>, _context: &C) -> Result<Option<D>, PipelineError> {
        Err(PipelineError::Unsupported {
            step: self.name().to_string(),
        })
    }

    fn is_multi(&self) -> bool {
        true
    }

    fn transform_multi(
        &self,
        source: &S,
        destination: Option<D>,
        context: &C,
    ) -> Result<Vec<Option<D>>, PipelineError> {
        match self.inner.can_transform(source, destination.as_ref(), context) {
            TransformAction::Transform => Ok(self.inner.apply_multi(source, destination, context)),
            TransformAction::PassThrough => Ok(vec![destination]),
            TransformAction::BreakTransformation => Ok(Vec::new()),
        }
    }
}
