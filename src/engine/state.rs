//! Run-level state machine
//!
//! ```text
//! Pending
//!     ↓
//! Running ──→ CompletedAll
//!     ├─────→ StoppedAtFailure
//!     └─────→ StoppedAtFalseCondition
//! ```
//!
//! A run starts once and ends once. Terminal states cannot be left, which is
//! what makes re-running an engine on the same document an error.

use std::fmt;

use thiserror::Error;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Engine built, no step executed yet
    #[default]
    Pending,

    /// Steps are being executed
    Running,

    /// Every step ran (terminal)
    CompletedAll,

    /// A hard error ended the run (terminal)
    StoppedAtFailure,

    /// A condition step did not hold (terminal, not an error)
    StoppedAtFalseCondition,
}

impl RunState {
    /// Returns true for the three end states
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CompletedAll | Self::StoppedAtFailure | Self::StoppedAtFalseCondition
        )
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::CompletedAll => "completed",
            Self::StoppedAtFailure => "stopped at failure",
            Self::StoppedAtFalseCondition => "stopped at false condition",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during run state transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunTransitionError {
    /// The run already started or finished
    #[error("Cannot start a run that is {from}")]
    AlreadyStarted { from: RunState },

    /// Tried to finish a run that is not running
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: RunState, to: RunState },
}

/// Owns the current run state and validates every transition
#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    current: RunState,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> RunState {
        self.current
    }

    /// Pending → Running
    pub fn start(&mut self) -> Result<(), RunTransitionError> {
        if self.current != RunState::Pending {
            return Err(RunTransitionError::AlreadyStarted { from: self.current });
        }
        self.current = RunState::Running;
        Ok(())
    }

    /// Running → one of the terminal states
    pub fn finish(&mut self, to: RunState) -> Result<(), RunTransitionError> {
        if self.current != RunState::Running || !to.is_terminal() {
            return Err(RunTransitionError::InvalidTransition {
                from: self.current,
                to,
            });
        }
        self.current = to;
        Ok(())
    }
}
