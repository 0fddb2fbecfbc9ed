//! Scenario Runner Library
//!
//! This library loads declarative JSON scenarios of filesystem actions, runs
//! them in order with argument chaining between steps, and writes the
//! annotated result document.

pub mod actions;
pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod persist;
pub mod runner;
pub mod types;

// Re-export main types for convenience
pub use actions::{Action, ActionError, ActionRegistry, Arity, TIME_FORMAT};
pub use document::{Document, DocumentError, Step, StepsResult};
pub use engine::{Engine, EngineError, RunOutcome, RunState};
pub use error::{ErrorKind, ScenarioError};
pub use persist::{DocumentSink, JsonFileSink, MemorySink, PersistError};
pub use runner::run_scenario_file;
pub use types::{ActionKind, StepStatus};
