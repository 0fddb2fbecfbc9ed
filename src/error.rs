//! Error handling module for the scenario runner
//!
//! Each layer owns a typed error. Action and persistence failures always
//! surface through `EngineError`, so `ScenarioError` only gathers loading,
//! running and input errors. `ErrorKind` is the machine-checkable
//! classification recorded on the aggregate result.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::document::DocumentError;
use crate::engine::EngineError;

/// Classification of the error recorded on a run's aggregate result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Condition step reported that the time ordering did not hold
    FalseCondition,
    /// Action received the wrong number of arguments
    Arity,
    /// A file the action needed does not exist
    NotFound,
    /// Timestamp argument did not match the expected format
    InvalidTimestamp,
    /// Any other OS failure inside an action
    Io,
    /// No action is registered for the step kind
    InvalidAction,
}

/// Main error type for the scenario runner
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Loading or validating the input document failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Running the steps failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Command-line input was rejected
    #[error("Invalid input: {0}")]
    Input(String),
}

/// Result type alias for scenario operations
pub type Result<T> = std::result::Result<T, ScenarioError>;

impl ScenarioError {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }
}
