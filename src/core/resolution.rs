//! Destination resolution
//!
//! Decides whether a step reuses the destination it was handed, receives a
//! freshly created one, or gets nothing at all. The order is fixed:
//!
//! 1. reuse a present destination unless the step is effectively isolated
//! 2. the pipeline's initial-destination factory, when one is set
//! 3. auto-creation (instance factory, else the default constructor)
//! 4. no destination

use crate::core::{config::Configuration, error::PipelineError};
use std::fmt;
use std::rc::{Rc, Weak};

/// Produces the initial destination from the run's context
pub type InitialDestinationFactory<D, C> = Rc<dyn Fn(&C) -> Option<D>>;

/// Resolution inputs shared between a pipeline and the steps attached to it.
///
/// Steps hold a weak reference to the policy of the pipeline that owns them;
/// the pipeline holds the only strong one.
pub struct DestinationPolicy<D, C> {
    configuration: Configuration,
    initial_destination: Option<InitialDestinationFactory<D, C>>,
    constructor: Option<fn() -> D>,
}

impl<D: 'static, C> DestinationPolicy<D, C> {
    pub(crate) fn new(configuration: Configuration, constructor: Option<fn() -> D>) -> Self {
        Self {
            configuration,
            initial_destination: None,
            constructor,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn has_initial_destination(&self) -> bool {
        self.initial_destination.is_some()
    }

    pub(crate) fn with_configuration(&self, configuration: Configuration) -> Self {
        Self {
            configuration,
            initial_destination: self.initial_destination.clone(),
            constructor: self.constructor,
        }
    }

    pub(crate) fn with_initial_destination(&self, factory: InitialDestinationFactory<D, C>) -> Self {
        Self {
            configuration: self.configuration.clone(),
            initial_destination: Some(factory),
            constructor: self.constructor,
        }
    }

    /// Resolve the destination a step (or executor) should work on
    pub fn resolve(
        &self,
        context: &C,
        destination: Option<D>,
        isolated: bool,
    ) -> Result<Option<D>, PipelineError> {
        if let Some(existing) = destination {
            if !isolated {
                return Ok(Some(existing));
            }
        }

        if let Some(factory) = &self.initial_destination {
            return Ok(factory(context));
        }

        if self.configuration.auto_create_destination {
            return self.configuration.create_instance(self.constructor);
        }

        Ok(None)
    }
}

impl<D, C> fmt::Debug for DestinationPolicy<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationPolicy")
            .field("configuration", &self.configuration)
            .field("initial_destination", &self.initial_destination.is_some())
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Per-step isolation flags plus the back-reference to the owning pipeline
pub struct StepBinding<D, C> {
    isolated: bool,
    keep_initial_destination: bool,
    owner: Option<Weak<DestinationPolicy<D, C>>>,
}

impl<D: 'static, C> StepBinding<D, C> {
    pub fn new() -> Self {
        Self {
            isolated: false,
            keep_initial_destination: false,
            owner: None,
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn keeps_initial_destination(&self) -> bool {
        self.keep_initial_destination
    }

    pub fn set_isolation(&mut self, isolated: bool, keep_initial_destination: bool) {
        self.isolated = isolated;
        self.keep_initial_destination = keep_initial_destination;
    }

    /// Isolated and not asked to keep the destination it is given
    pub fn is_effectively_isolated(&self) -> bool {
        self.isolated && !self.keep_initial_destination
    }

    pub fn is_attached(&self) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.strong_count() > 0)
    }

    /// Check whether this binding points at the given policy
    pub fn is_bound_to(&self, policy: &Rc<DestinationPolicy<D, C>>) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|owner| std::ptr::eq(owner.as_ptr(), Rc::as_ptr(policy)))
    }

    pub(crate) fn bind(&mut self, owner: Option<Weak<DestinationPolicy<D, C>>>) {
        self.owner = owner;
    }

    /// Resolve a destination using this step's isolation and its owner's policy.
    ///
    /// A detached step can only reuse what it is given.
    pub fn resolve(&self, context: &C, destination: Option<D>) -> Result<Option<D>, PipelineError> {
        let isolated = self.is_effectively_isolated();
        match self.owner.as_ref().and_then(Weak::upgrade) {
            Some(policy) => policy.resolve(context, destination, isolated),
            None => Ok(destination.filter(|_| !isolated)),
        }
    }
}

impl<D: 'static, C> Default for StepBinding<D, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static, C> fmt::Debug for StepBinding<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepBinding")
            .field("isolated", &self.isolated)
            .field("keep_initial_destination", &self.keep_initial_destination)
            .field("attached", &self.is_attached())
            .finish()
    }
}
