//! `taskmodel-ctl check`: generate in memory and report per-node results.

use std::path::Path;

use super::{failure_summary, load_definition, run_generation, CommandError};
use crate::cli_config::CliConfig;
use crate::output;

pub(crate) fn handle_check_command(
    config: &CliConfig,
    definition_path: &Path,
    templates: Option<&Path>,
) -> Result<(), CommandError> {
    let definition = load_definition(definition_path, None)?;
    let outcomes = run_generation(config, &definition, templates)?;

    output::header(format!("Process {}", definition.id));
    output::label("Package", &definition.package);
    output::label("Nodes", outcomes.len());

    if outcomes.is_empty() {
        output::warning("process defines no task nodes");
    }

    for outcome in &outcomes {
        match &outcome.result {
            Ok(artifacts) => output::status_icon(
                true,
                format!(
                    "{} ({}) -> {}{}",
                    outcome.node_id,
                    outcome.node_name,
                    artifacts.model.qualified_name,
                    if outcome.ad_hoc { " [ad hoc]" } else { "" }
                ),
            ),
            Err(e) => output::status_icon(
                false,
                format!("{} ({}): {e}", outcome.node_id, outcome.node_name),
            ),
        }
    }

    failure_summary(&outcomes)?;
    output::success("All task nodes generate cleanly");
    Ok(())
}
