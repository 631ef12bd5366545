//! Command handlers for the taskmodel CLI.

pub(crate) mod check;
pub(crate) mod generate;

pub(crate) use check::handle_check_command;
pub(crate) use generate::handle_generate_command;

use std::path::{Path, PathBuf};

use taskmodel_codegen::{
    generate_process, parse_definition, CodegenError, LoadError, NodeOutcome, ProcessDefinition,
    StandardTypeRegistry, TemplateCatalog,
};

use crate::cli_config::{expand_path, CliConfig};

#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("node '{0}' not found in process definition")]
    NodeNotFound(String),

    #[error("{failed} of {total} task nodes failed to generate")]
    NodesFailed { failed: usize, total: usize },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parse the definition, optionally narrowed to one node.
fn load_definition(path: &Path, node: Option<&str>) -> Result<ProcessDefinition, CommandError> {
    let mut definition = parse_definition(path)?;
    if let Some(node_id) = node {
        definition.nodes.retain(|n| n.id == node_id);
        if definition.nodes.is_empty() {
            return Err(CommandError::NodeNotFound(node_id.to_string()));
        }
    }
    Ok(definition)
}

/// `--templates`, then the configured directory, then the built-in templates.
fn template_catalog(config: &CliConfig, templates: Option<&Path>) -> TemplateCatalog {
    match templates {
        Some(dir) => TemplateCatalog::from_dir(dir),
        None => match &config.templates_dir {
            Some(dir) => TemplateCatalog::from_dir(expand_path(dir)),
            None => TemplateCatalog::builtin(),
        },
    }
}

fn type_registry(config: &CliConfig) -> StandardTypeRegistry {
    let mut registry = StandardTypeRegistry::new();
    for class in &config.custom_types {
        registry.register_class(class);
    }
    registry
}

/// Generate all nodes of the definition with the configured collaborators.
fn run_generation(
    config: &CliConfig,
    definition: &ProcessDefinition,
    templates: Option<&Path>,
) -> Result<Vec<NodeOutcome>, CommandError> {
    let registry = type_registry(config);
    let catalog = template_catalog(config, templates);
    Ok(generate_process(
        definition,
        &registry,
        &catalog,
        &config.codegen,
    )?)
}

fn failure_summary(outcomes: &[NodeOutcome]) -> Result<(), CommandError> {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(CommandError::NodesFailed {
            failed,
            total: outcomes.len(),
        })
    }
}
