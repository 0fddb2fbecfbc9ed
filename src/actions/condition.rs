//! Time-ordering condition
//!
//! Arguments are laid out as `[lower, upper, carried...]`: two configured
//! timestamps followed by whatever the engine appended from the previous step.
//! The ordering holds when `lower` is strictly after `upper`; the last carried
//! value (the file name) is then returned for the next step.

use chrono::NaiveDateTime;

use super::{ActionError, Arity, TIME_FORMAT};
use crate::types::ActionKind;

/// Parse a timestamp in the scenario format (`YYYY-MM-DD HH:MM:SS`)
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ActionError> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|source| {
        ActionError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// Compare the two leading timestamps.
///
/// Returns the carried file name when the first is after the second, and
/// [`ActionError::FalseCondition`] otherwise. Values after the two bounds,
/// such as a forwarded change time, are carried but never compared.
pub fn validate_condition(args: &[String]) -> Result<String, ActionError> {
    Arity::AtLeast(3).check(ActionKind::Condition, args)?;

    let first = parse_timestamp(&args[0])?;
    let second = parse_timestamp(&args[1])?;

    if first > second {
        Ok(args[args.len() - 1].clone())
    } else {
        Err(ActionError::FalseCondition)
    }
}
