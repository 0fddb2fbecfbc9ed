//! Action contracts and the kind → action registry
//!
//! Every step kind maps to one [`Action`]. Actions validate their own
//! argument count and return a result string that the engine may forward to
//! the next step.
//!
//! The registry is an explicit value handed to the engine, so tests can swap
//! any single action for a double:
//!
//! ```
//! use scenario_runner::actions::{ActionError, ActionRegistry};
//! use scenario_runner::types::ActionKind;
//!
//! let mut registry = ActionRegistry::with_filesystem_actions();
//! registry.register(ActionKind::Remove, |_: &[String]| -> Result<String, ActionError> {
//!     Ok(String::new())
//! });
//! assert!(registry.get(ActionKind::Remove).is_some());
//! assert!(registry.get(ActionKind::Unknown).is_none());
//! ```

pub mod condition;
pub mod fs;

use std::collections::HashMap;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::types::ActionKind;

/// Fixed pattern used for `c_time` output and `condition` bounds
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors an action can report
#[derive(Error, Debug)]
pub enum ActionError {
    /// Condition ordering did not hold. Not a defect: the engine stops gracefully.
    #[error("false condition")]
    FalseCondition,

    /// Wrong number of arguments
    #[error("{action}: invalid argument count, expected {expected} got {got}")]
    Arity {
        action: ActionKind,
        expected: Arity,
        got: usize,
    },

    /// Target file is missing (or is a directory)
    #[error("{action} {path}: file does not exist")]
    NotFound { action: ActionKind, path: String },

    /// Timestamp argument did not parse
    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// OS failure while touching the filesystem
    #[error("{action} {path}: {source}")]
    Io {
        action: ActionKind,
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Classification recorded on the aggregate result
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FalseCondition => ErrorKind::FalseCondition,
            Self::Arity { .. } => ErrorKind::Arity,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTimestamp { .. } => ErrorKind::InvalidTimestamp,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(action: ActionKind, path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound {
                action,
                path: path.to_string(),
            };
        }
        Self::Io {
            action,
            path: path.to_string(),
            source,
        }
    }
}

/// Accepted argument count for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    /// Fails with [`ActionError::Arity`] unless `args` fits this arity
    pub fn check(self, action: ActionKind, args: &[String]) -> Result<(), ActionError> {
        let ok = match self {
            Self::Exactly(n) => args.len() == n,
            Self::AtLeast(n) => args.len() >= n,
        };
        if ok {
            Ok(())
        } else {
            Err(ActionError::Arity {
                action,
                expected: self,
                got: args.len(),
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A named, arity-checked operation invoked by the engine.
///
/// Any `Fn(&[String]) -> Result<String, ActionError>` is an action, which
/// keeps test doubles to a closure.
pub trait Action {
    /// Run the action. The returned string is forwarded per the chaining rules.
    fn execute(&self, args: &[String]) -> Result<String, ActionError>;
}

impl<F> Action for F
where
    F: Fn(&[String]) -> Result<String, ActionError>,
{
    fn execute(&self, args: &[String]) -> Result<String, ActionError> {
        self(args)
    }
}

/// Registry of actions keyed by step kind
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<ActionKind, Box<dyn Action>>,
}

impl ActionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the action for a kind
    pub fn register(&mut self, kind: ActionKind, action: impl Action + 'static) {
        self.actions.insert(kind, Box::new(action));
    }

    /// Get the action for a kind
    pub fn get(&self, kind: ActionKind) -> Option<&dyn Action> {
        self.actions.get(&kind).map(|action| action.as_ref())
    }

    /// Kinds that currently have an action
    pub fn kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.actions.keys().copied()
    }

    /// Create a registry with the built-in filesystem and condition actions
    pub fn with_filesystem_actions() -> Self {
        let mut registry = Self::new();
        registry.register(ActionKind::Create, fs::create_file);
        registry.register(ActionKind::Remove, fs::remove_file);
        registry.register(ActionKind::Rename, fs::rename_file);
        registry.register(ActionKind::CTime, fs::ctime_file);
        registry.register(ActionKind::Write, fs::write_lines);
        registry.register(ActionKind::Condition, condition::validate_condition);
        registry
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.kinds().map(|k| k.to_string()).collect();
        kinds.sort();
        f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arity_exactly() {
        assert!(Arity::Exactly(1).check(ActionKind::Create, &args(&["a"])).is_ok());
        let err = Arity::Exactly(1)
            .check(ActionKind::Create, &args(&["a", "b"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "create: invalid argument count, expected 1 got 2");
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn test_arity_at_least() {
        assert!(Arity::AtLeast(1).check(ActionKind::Write, &args(&["a", "b", "c"])).is_ok());
        let err = Arity::AtLeast(3)
            .check(ActionKind::Condition, &args(&["a"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "condition: invalid argument count, expected at least 3 got 1"
        );
    }

    #[test]
    fn test_io_not_found_is_classified() {
        let err = ActionError::io(
            ActionKind::Remove,
            "/nope",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ActionError::io(
            ActionKind::Remove,
            "/nope",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_registry_with_filesystem_actions() {
        let registry = ActionRegistry::with_filesystem_actions();
        for kind in ActionKind::executable() {
            assert!(registry.get(*kind).is_some(), "{} should be registered", kind);
        }
        assert!(registry.get(ActionKind::Unknown).is_none());
    }

    #[test]
    fn test_registry_closure_double() {
        let mut registry = ActionRegistry::new();
        registry.register(ActionKind::Create, |a: &[String]| -> Result<String, ActionError> {
            Ok(format!("made {}", a.len()))
        });
        let action = registry.get(ActionKind::Create).unwrap();
        assert_eq!(action.execute(&args(&["x", "y"])).unwrap(), "made 2");
        assert!(format!("{:?}", registry).contains("create"));
    }
}
