use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScenarioError};

/// Default destination for the annotated document
pub const DEFAULT_OUTPUT: &str = "result.json";

/// Scenario runner - run filesystem operations from a JSON scenario
#[derive(Parser, Debug)]
#[command(name = "scenario-runner")]
#[command(about = "Run operations from a JSON scenario and save the annotated result")]
#[command(version)]
pub struct Cli {
    /// Path to the scenario (must have a .json extension)
    #[arg(short, long, value_name = "PATH")]
    pub scenario: PathBuf,

    /// Path to save the result
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Reject scenarios without a `.json` extension
    pub fn validate(&self) -> Result<()> {
        check_json_extension(&self.scenario)
    }
}

fn check_json_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(()),
        _ => Err(ScenarioError::input("scenario must have json ext")),
    }
}
