//! Engine configuration
//!
//! Instance-creation knobs consulted when a pipeline has to come up with a
//! destination on its own. A process-wide default exists, but it is only a
//! starting value: pipelines copy it when they are constructed and never read
//! it again while running.

use crate::core::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// The type an instance factory is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRequest {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeRequest {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Check whether this request asks for `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// Creates instances on behalf of pipelines (e.g. bridging to a container).
///
/// Returning `None` means "no instance", which the engine treats as an
/// absent destination.
pub type InstanceFactory = Arc<dyn Fn(TypeRequest) -> Option<Box<dyn Any>> + Send + Sync>;

/// Instance-creation settings for a pipeline
#[derive(Clone)]
pub struct Configuration {
    /// Custom instantiation; falls back to the destination's default constructor
    pub instance_factory: Option<InstanceFactory>,

    /// Create the initial destination automatically when none is supplied
    pub auto_create_destination: bool,

    /// Give isolated steps a fresh destination unless they opt out
    pub isolate_initial_destination: bool,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            instance_factory: None,
            auto_create_destination: true,
            isolate_initial_destination: true,
        }
    }

    pub fn with_instance_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(TypeRequest) -> Option<Box<dyn Any>> + Send + Sync + 'static,
    {
        self.instance_factory = Some(Arc::new(factory));
        self
    }

    pub fn with_auto_create_destination(mut self, enabled: bool) -> Self {
        self.auto_create_destination = enabled;
        self
    }

    pub fn with_isolate_initial_destination(mut self, enabled: bool) -> Self {
        self.isolate_initial_destination = enabled;
        self
    }

    /// Copy of the current process-wide default
    pub fn process_default() -> Self {
        process_slot()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the process-wide default used by pipelines created afterwards
    pub fn set_process_default(configuration: Configuration) {
        *process_slot()
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = configuration;
    }

    /// Build a new `D`, preferring the instance factory over `constructor`
    pub(crate) fn create_instance<D: 'static>(
        &self,
        constructor: Option<fn() -> D>,
    ) -> Result<Option<D>, PipelineError> {
        if let Some(factory) = &self.instance_factory {
            return match factory(TypeRequest::of::<D>()) {
                Some(instance) => instance
                    .downcast::<D>()
                    .map(|boxed| Some(*boxed))
                    .map_err(|_| PipelineError::InstanceType {
                        expected: std::any::type_name::<D>(),
                    }),
                None => Ok(None),
            };
        }

        match constructor {
            Some(construct) => Ok(Some(construct())),
            None => Err(PipelineError::NoConstructor {
                type_name: std::any::type_name::<D>(),
            }),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("instance_factory", &self.instance_factory.is_some())
            .field("auto_create_destination", &self.auto_create_destination)
            .field("isolate_initial_destination", &self.isolate_initial_destination)
            .finish()
    }
}

fn process_slot() -> &'static RwLock<Configuration> {
    static SLOT: OnceLock<RwLock<Configuration>> = OnceLock::new();
    SLOT.get_or_init(|| RwLock::new(Configuration::new()))
}

/// Serializable subset of [`Configuration`] for file-based setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_true")]
    pub auto_create_destination: bool,

    #[serde(default = "default_true")]
    pub isolate_initial_destination: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_create_destination: true,
            isolate_initial_destination: true,
        }
    }
}

impl EngineSettings {
    /// Overlay these settings on an existing configuration, keeping its factory
    pub fn apply_to(self, configuration: Configuration) -> Configuration {
        configuration
            .with_auto_create_destination(self.auto_create_destination)
            .with_isolate_initial_destination(self.isolate_initial_destination)
    }
}

impl From<EngineSettings> for Configuration {
    fn from(settings: EngineSettings) -> Self {
        settings.apply_to(Configuration::new())
    }
}
