//! Scenario document loading and the annotated result model.
//!
//! The same shape is used for input and output: the loader rejects documents
//! whose steps already carry a result, so a persisted run cannot be replayed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::ErrorKind;
use crate::types::{ActionKind, StepStatus, empty_as_none};

/// Errors that can occur while loading a scenario
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Scenario file could not be read
    #[error("failed read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Scenario JSON is malformed or names an unknown action
    #[error("failed parse scenario {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A step already carries a result (document was produced by a run)
    #[error("error steps already processed")]
    AlreadyProcessed,
}

/// One action invocation and its eventual outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: ActionKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<StepStatus>,
}

impl Step {
    /// Create a pending step
    pub fn new<I, S>(name: ActionKind, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            args: args.into_iter().map(Into::into).collect(),
            result: None,
        }
    }
}

/// Run-level summary of the step outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepsResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,

    /// 1-based index of the first failed step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

impl StepsResult {
    /// Every step has been accounted for
    pub fn is_balanced(&self) -> bool {
        self.success + self.failed == self.total
    }

    pub(crate) fn record_error(
        &mut self,
        failed_step: Option<usize>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) {
        self.failed_step = failed_step;
        self.error_kind = Some(kind);
        self.error = Some(message.into());
    }
}

/// Ordered steps plus the aggregate outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub steps: Vec<Step>,

    #[serde(default)]
    pub steps_result: StepsResult,
}

impl Document {
    /// Build a fresh document from steps
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            steps_result: StepsResult::default(),
        }
    }

    /// Load and validate a scenario from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        info!("scenario build from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content).map_err(|err| match err {
            DocumentError::Decode { source, .. } => DocumentError::Decode {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a scenario from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let decode_err = |source| DocumentError::Decode {
            path: "<inline>".to_string(),
            source,
        };

        let raw: serde_json::Value = serde_json::from_str(json).map_err(decode_err)?;
        // Any non-empty result string marks a processed document, even one
        // that is not a recognized status.
        if has_recorded_result(&raw) {
            return Err(DocumentError::AlreadyProcessed);
        }

        let mut doc: Self = serde_json::from_value(raw).map_err(decode_err)?;
        doc.validate()?;
        // Any aggregate in the input is stale; the engine recomputes it.
        doc.steps_result = StepsResult::default();
        Ok(doc)
    }

    /// Anti-replay guard: no step may already have a result
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.steps.iter().any(|step| step.result.is_some()) {
            return Err(DocumentError::AlreadyProcessed);
        }
        Ok(())
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the document has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn has_recorded_result(raw: &serde_json::Value) -> bool {
    let Some(steps) = raw.get("steps").and_then(serde_json::Value::as_array) else {
        return false;
    };
    steps.iter().any(|step| {
        step.get("result")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|result| !result.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = Document::from_json(
            r#"{"steps":[{"name":"create","args":["a.txt"]},{"name":"CTime","args":["a.txt"],"result":""}]}"#,
        )
        .unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.steps[0].name, ActionKind::Create);
        assert_eq!(doc.steps[1].name, ActionKind::CTime);
        assert_eq!(doc.steps[1].result, None);
        assert_eq!(doc.steps_result, StepsResult::default());
    }

    #[test]
    fn test_rejects_processed_document() {
        let err = Document::from_json(
            r#"{"steps":[{"name":"create","args":["a.txt"],"result":"success"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyProcessed));
    }

    #[test]
    fn test_rejects_unrecognized_result_as_processed() {
        let err = Document::from_json(
            r#"{"steps":[{"name":"create","args":["a"],"result":"done"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyProcessed), "{:?}", err);
    }

    #[test]
    fn test_processed_check_precedes_name_decoding() {
        let err = Document::from_json(
            r#"{"steps":[{"name":"chmod","args":["a"]},{"name":"create","result":"failed"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyProcessed), "{:?}", err);
    }

    #[test]
    fn test_rejects_unknown_action_name() {
        let err = Document::from_json(r#"{"steps":[{"name":"chmod","args":["a"]}]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Decode { .. }));
        assert!(err.to_string().contains("unknown action name"));
    }

    #[test]
    fn test_unknown_sentinel_decodes() {
        let doc = Document::from_json(r#"{"steps":[{"name":"unknown"}]}"#).unwrap();
        assert_eq!(doc.steps[0].name, ActionKind::Unknown);
        assert!(doc.steps[0].args.is_empty());
    }

    #[test]
    fn test_output_shape() {
        let mut doc = Document::new(vec![
            Step::new(ActionKind::Remove, ["f"]),
            Step::new(ActionKind::Write, Vec::<String>::new()),
        ]);
        doc.steps[0].result = Some(StepStatus::Success);
        doc.steps[1].result = Some(StepStatus::Failed);
        doc.steps_result = StepsResult {
            total: 2,
            success: 1,
            failed: 1,
            ..Default::default()
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["steps"][0]["result"], "success");
        assert_eq!(value["steps"][1]["result"], "failed");
        assert!(value["steps"][1].get("args").is_none());
        assert_eq!(value["steps_result"]["total"], 2);
        assert!(value["steps_result"].get("failed_step").is_none());
        assert!(value["steps_result"].get("error").is_none());
        assert!(value["steps_result"].get("error_kind").is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Document::load_from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_load_from_file_reports_path_on_decode_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Document::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"), "{}", err);
    }
}
