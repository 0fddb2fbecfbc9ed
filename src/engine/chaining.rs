//! Argument chaining between consecutive steps.
//!
//! | current | next      | forwarded set F                  |
//! |---------|-----------|----------------------------------|
//! | c_time  | condition | `[r] + configured`               |
//! | c_time  | other     | `configured` (r discarded)       |
//! | other   | condition | `[c_time(base)] + base`          |
//! | other   | other     | `base`                           |
//!
//! `base` is `[r]` when the step's result string `r` is non-empty, else `[]`.
//! F is appended to a condition step's arguments and prepended to anything
//! else, so a condition keeps its two configured bounds first.

use crate::actions::ActionError;
use crate::document::Step;
use crate::types::ActionKind;

/// What the current step forwards to its successor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarding {
    /// The result string, if any
    Result,
    /// A copy of the current step's configured arguments
    ConfiguredArgs,
    /// Result string followed by the configured arguments
    ResultThenConfigured,
    /// Change time of the forwarded file, then the result string
    ImplicitCTime,
}

impl Forwarding {
    /// Decision table keyed by `(current, next)`
    pub const fn for_pair(current: ActionKind, next: ActionKind) -> Self {
        match (current, next) {
            (ActionKind::CTime, ActionKind::Condition) => Self::ResultThenConfigured,
            (ActionKind::CTime, _) => Self::ConfiguredArgs,
            (_, ActionKind::Condition) => Self::ImplicitCTime,
            _ => Self::Result,
        }
    }

    /// Compute the forwarded set.
    ///
    /// `implicit_ctime` is only called for [`Forwarding::ImplicitCTime`], with
    /// the base set as input. The successor's own arguments are never consulted.
    pub fn forward<F>(
        self,
        result: &str,
        configured: &[String],
        implicit_ctime: F,
    ) -> Result<Vec<String>, ActionError>
    where
        F: FnOnce(&[String]) -> Result<String, ActionError>,
    {
        let mut base = Vec::with_capacity(configured.len() + 2);
        if !result.is_empty() {
            base.push(result.to_string());
        }

        let forwarded = match self {
            Self::Result => base,
            Self::ConfiguredArgs => configured.to_vec(),
            Self::ResultThenConfigured => {
                base.extend_from_slice(configured);
                base
            }
            Self::ImplicitCTime => {
                let stamp = implicit_ctime(&base)?;
                base.insert(0, stamp);
                base
            }
        };
        Ok(forwarded)
    }
}

/// Where forwarded arguments land in the successor's argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Append,
    Prepend,
}

impl Delivery {
    pub const fn for_kind(next: ActionKind) -> Self {
        match next {
            ActionKind::Condition => Self::Append,
            _ => Self::Prepend,
        }
    }
}

/// Merge `forwarded` into `step.args` according to the step's kind
pub fn deliver(step: &mut Step, forwarded: Vec<String>) {
    match Delivery::for_kind(step.name) {
        Delivery::Append => step.args.extend(forwarded),
        Delivery::Prepend => {
            let mut args = forwarded;
            args.append(&mut step.args);
            step.args = args;
        }
    }
}
