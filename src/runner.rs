//! Scenario file execution
//!
//! Wires loader → engine → JSON writer. This is what the binary calls; tests
//! and embedders can call it with their own registry.

use std::path::Path;

use tracing::info;

use crate::actions::ActionRegistry;
use crate::document::Document;
use crate::engine::{Engine, RunOutcome};
use crate::error::Result;
use crate::persist::JsonFileSink;

/// Load `scenario`, run it with `registry`, and write the annotated result to `out`.
///
/// A false condition is a normal stop and returns `Ok`. The output file is
/// written on every path except a load failure or an unregistered action.
pub fn run_scenario_file(
    registry: &ActionRegistry,
    scenario: impl AsRef<Path>,
    out: impl AsRef<Path>,
) -> Result<RunOutcome> {
    let doc = Document::load_from_file(scenario.as_ref())?;
    info!("scenario loaded with {} steps", doc.len());

    let mut engine = Engine::new(registry, doc, JsonFileSink::new(out.as_ref()));
    let outcome = engine.run()?;

    let summary = &engine.document().steps_result;
    info!(
        "scenario finished: total {} success {} failed {}",
        summary.total, summary.success, summary.failed
    );
    Ok(outcome)
}
