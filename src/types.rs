//! Type-safe scenario vocabulary
//!
//! Action kinds and step outcomes are proper enums instead of raw strings so
//! the engine can match on them exhaustively.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString};

/// Filesystem action a scenario step performs.
///
/// Parsing is case-insensitive and accepts both `c_time` and `ctime`.
/// `Unknown` is decodable but is never registered with an action, so a step
/// carrying it always aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Unknown,
    Create,
    Remove,
    Rename,
    #[strum(to_string = "c_time", serialize = "ctime")]
    CTime,
    Write,
    Condition,
}

impl ActionKind {
    /// Kinds that have a filesystem or decision primitive behind them
    pub const fn executable() -> &'static [Self] {
        &[
            Self::Create,
            Self::Remove,
            Self::Rename,
            Self::CTime,
            Self::Write,
            Self::Condition,
        ]
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown action name '{}'", raw)))
    }
}

/// Recorded outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

/// Deserializes a step result where an empty string means "not run yet".
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<StepStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid step result '{}'", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_action_kind_parses_case_insensitive() {
        assert_eq!("CREATE".parse::<ActionKind>().unwrap(), ActionKind::Create);
        assert_eq!("Condition".parse::<ActionKind>().unwrap(), ActionKind::Condition);
        assert_eq!("c_time".parse::<ActionKind>().unwrap(), ActionKind::CTime);
        assert_eq!("CTime".parse::<ActionKind>().unwrap(), ActionKind::CTime);
        assert!("copy".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_display_is_snake_case() {
        assert_eq!(ActionKind::CTime.to_string(), "c_time");
        assert_eq!(ActionKind::Write.to_string(), "write");
        assert_eq!(ActionKind::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_executable_excludes_unknown() {
        let executable = ActionKind::executable();
        assert_eq!(executable.len(), ActionKind::iter().count() - 1);
        assert!(!executable.contains(&ActionKind::Unknown));
    }

    #[test]
    fn test_action_kind_json() {
        let kind: ActionKind = serde_json::from_str("\"ctime\"").unwrap();
        assert_eq!(kind, ActionKind::CTime);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"c_time\"");
        assert!(serde_json::from_str::<ActionKind>("\"chmod\"").is_err());
    }

    #[test]
    fn test_step_status_serialization() {
        assert_eq!(serde_json::to_string(&StepStatus::Success).unwrap(), "\"success\"");
        assert_eq!(serde_json::to_string(&StepStatus::Failed).unwrap(), "\"failed\"");
    }
}
