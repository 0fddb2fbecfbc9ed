//! Execution engine. Runs a scenario's steps in order.
//!
//! The engine exclusively owns the [`Document`] for the duration of a run. It
//! resolves each step's action through the [`ActionRegistry`], chains results
//! into the next step (see [`chaining`]), keeps the aggregate counts, and hands
//! the annotated document to a [`DocumentSink`] exactly once when the run ends.
//!
//! # Terminal paths
//!
//! | Trigger              | Steps marked                        | Persisted | Returns |
//! |----------------------|-------------------------------------|-----------|---------|
//! | all steps succeed    | all `success`                       | yes       | `Ok(CompletedAll)` |
//! | condition is false   | condition `success`, rest `failed`  | yes       | `Ok(StoppedAtFalseCondition)` |
//! | action error         | failing step and rest `failed`      | yes       | `Err(StepFailed)` |
//! | unregistered kind    | untouched                           | no        | `Err(InvalidAction)` |

pub mod chaining;
pub mod state;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::actions::{Action, ActionError, ActionRegistry};
use crate::document::{Document, StepsResult};
use crate::error::ErrorKind;
use crate::persist::{DocumentSink, PersistError};
use crate::types::{ActionKind, StepStatus};

use chaining::{Forwarding, deliver};
pub use state::{RunState, RunTracker, RunTransitionError};

/// Errors that end a run
#[derive(Error, Debug)]
pub enum EngineError {
    /// No action registered for a step kind; nothing was persisted
    #[error("invalid action step {kind} (step {step})")]
    InvalidAction { step: usize, kind: ActionKind },

    /// An action (or the implicit change-time lookup) failed at `step` (1-based)
    #[error("step {step} failed: {source}")]
    StepFailed {
        step: usize,
        #[source]
        source: ActionError,
    },

    /// Writing the result document failed; supersedes any earlier outcome
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Transition(#[from] RunTransitionError),
}

impl EngineError {
    /// Classification of the failure, when it came from a step
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidAction { .. } => Some(ErrorKind::InvalidAction),
            Self::StepFailed { source, .. } => Some(source.kind()),
            Self::Persist(_) | Self::Transition(_) => None,
        }
    }
}

/// How a run that returned `Ok` ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    CompletedAll,
    /// Condition at 1-based `step` did not hold
    StoppedAtFalseCondition { step: usize },
}

/// Drives one document through the registry
pub struct Engine<'r, S: DocumentSink> {
    registry: &'r ActionRegistry,
    sink: S,
    doc: Document,
    tracker: RunTracker,
}

impl<'r, S: DocumentSink> Engine<'r, S> {
    pub fn new(registry: &'r ActionRegistry, doc: Document, sink: S) -> Self {
        Self {
            registry,
            sink,
            doc,
            tracker: RunTracker::new(),
        }
    }

    /// The document in its current state
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn state(&self) -> RunState {
        self.tracker.current()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the document and sink
    pub fn into_parts(self) -> (Document, S) {
        (self.doc, self.sink)
    }

    /// Execute every step in order. May only be called once.
    pub fn run(&mut self) -> Result<RunOutcome, EngineError> {
        self.tracker.start()?;

        let total = self.doc.len();
        self.doc.steps_result = StepsResult {
            total,
            ..Default::default()
        };

        for i in 0..total {
            let kind = self.doc.steps[i].name;
            let action = self.resolve(i, kind)?;

            info!("run step {} action {}", i + 1, kind);
            let result = match action.execute(&self.doc.steps[i].args) {
                Ok(result) => result,
                Err(ActionError::FalseCondition) => return self.stop_at_false_condition(i),
                Err(err) => return self.stop_at_failure(i, err),
            };

            let Some(next) = self.doc.steps.get(i + 1).map(|step| step.name) else {
                self.mark_success(i);
                break;
            };

            let rule = Forwarding::for_pair(kind, next);
            let ctime = match rule {
                Forwarding::ImplicitCTime => Some(self.resolve(i, ActionKind::CTime)?),
                _ => None,
            };
            let forwarded = rule.forward(&result, &self.doc.steps[i].args, |input| {
                debug!("implicit c_time on {:?}", input);
                ctime.map_or_else(|| Ok(String::new()), |action| action.execute(input))
            });
            let forwarded = match forwarded {
                Ok(forwarded) => forwarded,
                Err(err) => return self.stop_at_failure(i, err),
            };

            self.mark_success(i);
            info!(
                "set args {:?} to next step num {} action {}",
                forwarded,
                i + 2,
                next
            );
            deliver(&mut self.doc.steps[i + 1], forwarded);
        }

        self.tracker.finish(RunState::CompletedAll)?;
        self.persist()?;
        Ok(RunOutcome::CompletedAll)
    }

    fn resolve(
        &mut self,
        index: usize,
        kind: ActionKind,
    ) -> Result<&'r dyn Action, EngineError> {
        let registry: &'r ActionRegistry = self.registry;
        match registry.get(kind) {
            Some(action) => Ok(action),
            None => {
                warn!("invalid action {} at step {}", kind, index + 1);
                self.tracker.finish(RunState::StoppedAtFailure)?;
                Err(EngineError::InvalidAction {
                    step: index + 1,
                    kind,
                })
            }
        }
    }

    fn mark_success(&mut self, index: usize) {
        self.doc.steps[index].result = Some(StepStatus::Success);
        self.doc.steps_result.success += 1;
    }

    /// Mark `from..` as failed without running them
    fn fail_from(&mut self, from: usize) {
        for step in &mut self.doc.steps[from..] {
            step.result = Some(StepStatus::Failed);
            self.doc.steps_result.failed += 1;
        }
    }

    fn stop_at_false_condition(&mut self, index: usize) -> Result<RunOutcome, EngineError> {
        let err = ActionError::FalseCondition;
        self.mark_success(index);
        self.fail_from(index + 1);

        self.doc
            .steps_result
            .record_error(Some(index + 2), err.kind(), err.to_string());
        info!("condition at step {} is false, stopping", index + 1);

        self.tracker.finish(RunState::StoppedAtFalseCondition)?;
        self.persist()?;
        Ok(RunOutcome::StoppedAtFalseCondition { step: index + 1 })
    }

    fn stop_at_failure(
        &mut self,
        index: usize,
        err: ActionError,
    ) -> Result<RunOutcome, EngineError> {
        self.fail_from(index);
        self.doc
            .steps_result
            .record_error(Some(index + 1), err.kind(), err.to_string());
        warn!("step {} failed: {}", index + 1, err);

        self.tracker.finish(RunState::StoppedAtFailure)?;
        self.persist()?;
        Err(EngineError::StepFailed {
            step: index + 1,
            source: err,
        })
    }

    fn persist(&mut self) -> Result<(), EngineError> {
        self.sink.persist(&self.doc)?;
        Ok(())
    }
}

/// Load-free convenience: run `doc` with `registry` and write to `sink`
pub fn run_document<S: DocumentSink>(
    registry: &ActionRegistry,
    doc: Document,
    sink: S,
) -> (Document, Result<RunOutcome, EngineError>) {
    let mut engine = Engine::new(registry, doc, sink);
    let outcome = engine.run();
    let (doc, _) = engine.into_parts();
    (doc, outcome)
}
