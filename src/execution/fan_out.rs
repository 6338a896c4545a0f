//! Fan-out executor
//!
//! Runs the pipeline over a working set of destinations. Ordinary steps are
//! applied to every destination in the set (multi-result steps may replace
//! one destination with many, or prune it). Isolated steps branch off: their
//! results are reported on their own and never rejoin the working set.
//!
//! Output order: whatever the main chain has pending is emitted right before
//! the first isolated step that follows it, then that step's results, and
//! finally the main chain once more at the end if it produced anything new
//! since the last flush.

use crate::core::{error::PipelineError, pipeline::Pipeline, step::Step};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Produces one or many destinations per source
#[derive(Debug)]
pub struct FanOut<S, D: 'static, C = ()> {
    pipeline: Pipeline<S, D, C>,
}

impl<S: 'static, D: Clone + 'static, C: 'static> FanOut<S, D, C> {
    pub fn new(pipeline: Pipeline<S, D, C>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline<S, D, C> {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> Pipeline<S, D, C> {
        self.pipeline
    }

    /// Lazily produce every result; nothing runs until the iterator is polled
    pub fn transform_multi<'a>(&'a self, source: &'a S, initial: Option<D>, context: &'a C) -> Outputs<'a, S, D, C> {
        Outputs {
            pipeline: &self.pipeline,
            source,
            context,
            initial,
            working: Vec::new(),
            ready: VecDeque::new(),
            cursor: 0,
            flushed: false,
            terminated: false,
            finished: false,
        }
    }

    /// The last result of [`FanOut::transform_multi`], if any
    pub fn transform(&self, source: &S, initial: Option<D>, context: &C) -> Result<Option<D>, PipelineError> {
        let mut last = None;
        for output in self.transform_multi(source, initial, context) {
            last = Some(output?);
        }
        Ok(last)
    }

    pub fn run<'a>(&'a self, source: &'a S, context: &'a C) -> Outputs<'a, S, D, C> {
        self.transform_multi(source, None, context)
    }
}

/// Lazy, forward-only sequence of fan-out results.
///
/// Fused: after the sequence ends, or after it yields an error, it only
/// returns `None`. Dropping it early is always fine.
pub struct Outputs<'a, S, D: 'static, C> {
    pipeline: &'a Pipeline<S, D, C>,
    source: &'a S,
    context: &'a C,
    initial: Option<D>,
    working: Vec<D>,
    ready: VecDeque<D>,
    cursor: usize,
    flushed: bool,
    terminated: bool,
    finished: bool,
}

impl<'a, S: 'static, D: Clone + 'static, C: 'static> Outputs<'a, S, D, C> {
    /// Do one unit of work: a flush, one step, or the final emission
    fn advance(&mut self) -> Result<(), PipelineError> {
        let pipeline = self.pipeline;
        let Some(step) = pipeline.steps().get(self.cursor) else {
            if !self.flushed {
                trace!("Emitting {} main-chain destinations at the end", self.working.len());
                self.ready.extend(self.working.drain(..));
            }
            self.finished = true;
            return Ok(());
        };

        if step.is_isolated() {
            // Emit pending main-chain results first; the step itself runs on the next pass
            if !self.flushed && !self.working.is_empty() {
                debug!("Flushing {} main-chain destinations before isolated step {}", self.working.len(), step.name());
                self.ready.extend(self.working.iter().cloned());
                self.flushed = true;
                return Ok(());
            }

            self.cursor += 1;
            return self.run_isolated(step.as_ref());
        }

        self.cursor += 1;
        if self.terminated {
            trace!("Main chain terminated, skipping step {}", step.name());
            return Ok(());
        }
        self.run_ordinary(step.as_ref())
    }

    fn run_isolated(&mut self, step: &dyn Step<S, D, C>) -> Result<(), PipelineError> {
        // Only a single pending destination is handed over; otherwise the run's initial one
        let candidate = match self.working.as_slice() {
            [single] => Some(single.clone()),
            _ => self.initial.clone(),
        };
        let input = step.binding().resolve(self.context, candidate)?;

        for output in produce(step, self.source, input, self.context)? {
            match output {
                Some(destination) => self.ready.push_back(destination),
                None => {
                    debug!("Isolated step {} stopped its branch", step.name());
                    break;
                }
            }
        }
        Ok(())
    }

    fn run_ordinary(&mut self, step: &dyn Step<S, D, C>) -> Result<(), PipelineError> {
        let inputs: Vec<Option<D>> = if self.working.is_empty() {
            vec![self.pipeline.resolve(self.context, self.initial.clone())?]
        } else {
            self.working.drain(..).map(Some).collect()
        };

        let mut next = Vec::with_capacity(inputs.len());
        let mut inputs = inputs.into_iter();
        while let Some(destination) = inputs.next() {
            let outputs = produce(step, self.source, destination, self.context)?;
            if outputs.is_empty() {
                debug!("Step {} pruned a destination", step.name());
                continue;
            }

            for output in outputs {
                match output {
                    Some(destination) => {
                        next.push(destination);
                        self.flushed = false;
                    }
                    None => {
                        self.terminated = true;
                        break;
                    }
                }
            }

            if self.terminated {
                debug!("Step {} returned no destination, terminating the main chain", step.name());
                // Destinations this step never reached stay as they are
                next.extend(inputs.by_ref().flatten());
                break;
            }
        }

        self.working = next;
        if self.working.is_empty() && !self.terminated {
            debug!("Step {} pruned every destination, terminating the main chain", step.name());
            self.terminated = true;
        }
        trace!("Working set holds {} destinations after step {}", self.working.len(), step.name());
        Ok(())
    }
}

/// Run a step through whichever contract it supports
fn produce<S, D: 'static, C>(
    step: &dyn Step<S, D, C>,
    source: &S,
    destination: Option<D>,
    context: &C,
) -> Result<Vec<Option<D>>, PipelineError> {
    if step.is_multi() {
        step.transform_multi(source, destination, context)
    } else {
        Ok(vec![step.transform(source, destination, context)?])
    }
}

impl<'a, S: 'static, D: Clone + 'static, C: 'static> Iterator for Outputs<'a, S, D, C> {
    type Item = Result<D, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(destination) = self.ready.pop_front() {
                return Some(Ok(destination));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.advance() {
                self.finished = true;
                self.ready.clear();
                self.working.clear();
                return Some(Err(err));
            }
        }
    }
}

impl<'a, S: 'static, D: Clone + 'static, C: 'static> FusedIterator for Outputs<'a, S, D, C> {}

impl<'a, S, D: 'static, C> fmt::Debug for Outputs<'a, S, D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outputs")
            .field("cursor", &self.cursor)
            .field("working", &self.working.len())
            .field("ready", &self.ready.len())
            .field("flushed", &self.flushed)
            .field("terminated", &self.terminated)
            .field("finished", &self.finished)
            .finish()
    }
}
