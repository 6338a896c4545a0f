//! Single-result executor

use crate::core::{error::PipelineError, pipeline::Pipeline};
use tracing::{debug, trace};

/// Folds one destination through every step in order.
///
/// The first step returning no destination ends the run; later steps are
/// never invoked. Isolation flags have no meaning here.
#[derive(Debug)]
pub struct Linear<S, D: 'static, C = ()> {
    pipeline: Pipeline<S, D, C>,
}

impl<S: 'static, D: Clone + 'static, C: 'static> Linear<S, D, C> {
    pub fn new(pipeline: Pipeline<S, D, C>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline<S, D, C> {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> Pipeline<S, D, C> {
        self.pipeline
    }

    pub fn transform(&self, source: &S, initial: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        let mut destination = self.pipeline.resolve(context, initial)?;

        for (index, step) in self.pipeline.steps().iter().enumerate() {
            trace!("Running step {} ({})", index, step.name());
            destination = step.transform(source, destination, context)?;
            if destination.is_none() {
                debug!("Step {} ({}) returned no destination, stopping", index, step.name());
                return Ok(None);
            }
        }

        Ok(destination)
    }

    /// Transform without an initial destination
    pub fn run(&self, source: &S, context: &C) -> Result<Option<D>, PipelineError> {
        self.transform(source, None, context)
    }
}
