//! `taskmodel-ctl generate`: write task model sources for a process.

use std::path::Path;

use taskmodel_codegen::{NodeOutcome, ProcessDefinition};

use super::{failure_summary, load_definition, run_generation, CommandError};
use crate::cli_config::{expand_path, CliConfig};
use crate::output;

/// File listing one dispatch `case` per generated node.
pub(crate) const DISPATCH_FILE: &str = "dispatch-entries.txt";

pub(crate) fn handle_generate_command(
    config: &CliConfig,
    definition_path: &Path,
    output_dir: Option<&Path>,
    templates: Option<&Path>,
    node: Option<&str>,
) -> Result<(), CommandError> {
    let definition = load_definition(definition_path, node)?;
    let outcomes = run_generation(config, &definition, templates)?;

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| config.default_output_dir.as_deref().map(expand_path));

    match output_dir {
        Some(dir) => write_artifacts(&dir, &definition, &outcomes)?,
        None => print_artifacts(&outcomes),
    }

    failure_summary(&outcomes)
}

fn write_artifacts(
    dir: &Path,
    definition: &ProcessDefinition,
    outcomes: &[NodeOutcome],
) -> Result<(), CommandError> {
    output::header(format!("Process {}", definition.id));
    output::label("Package", &definition.package);

    let mut cases = Vec::new();
    for outcome in outcomes {
        let artifacts = match &outcome.result {
            Ok(artifacts) => artifacts,
            Err(e) => {
                output::error(format!(
                    "node '{}' ({}): {e}",
                    outcome.node_id, outcome.node_name
                ));
                continue;
            }
        };

        for artifact in artifacts.artifacts() {
            let path = dir.join(artifact.relative_path());
            write_file(&path, &artifact.source)?;
            output::dim(format!("  wrote {}", path.display()));
        }
        cases.push(artifacts.dispatch.render_case());
    }

    let dispatch_path = dir.join(DISPATCH_FILE);
    let mut dispatch = cases.join("\n");
    if !dispatch.is_empty() {
        dispatch.push('\n');
    }
    write_file(&dispatch_path, &dispatch)?;

    output::success(format!(
        "Generated {} of {} task models into {}",
        cases.len(),
        outcomes.len(),
        dir.display()
    ));
    Ok(())
}

fn print_artifacts(outcomes: &[NodeOutcome]) {
    let mut cases = Vec::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(artifacts) => {
                for artifact in artifacts.artifacts() {
                    output::plain(&artifact.source);
                }
                cases.push(artifacts.dispatch.render_case());
            }
            Err(e) => output::error(format!(
                "node '{}' ({}): {e}",
                outcome.node_id, outcome.node_name
            )),
        }
    }
    if !cases.is_empty() {
        output::plain("// dispatch entries");
        for case in cases {
            output::plain(case);
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), CommandError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CommandError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, contents).map_err(|e| CommandError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
