//! Process definition files.
//!
//! A process definition lists the process variables and the task nodes of one
//! process in YAML. Maps keep document order, which fixes field order in the
//! generated artifacts.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::CodegenConfig;
use crate::error::CodegenResult;
use crate::generator::{CodegenContext, IoSpec, TaskModelArtifacts, TaskModelGenerator, TaskSpec};
use crate::template::TemplateCatalog;
use crate::types::TypeRegistry;
use crate::variables::{MapScope, VariableDef};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read process definition '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse process definition YAML '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessDefinition {
    /// Fully qualified process id, e.g. `org.acme.orders`.
    pub id: String,
    /// Java package of the generated classes.
    pub package: String,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

/// A task node of a process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    /// Ids of the nodes connected into this one.
    #[serde(default)]
    pub incoming: Vec<String>,
    #[serde(default)]
    pub metadata: IndexMap<String, Value>,
    /// Static work parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    #[serde(default)]
    pub io: IoSpec,
}

impl ProcessDefinition {
    pub fn node(&self, id: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Process-level variables with their types resolved.
    pub fn process_scope(&self, registry: &dyn TypeRegistry) -> CodegenResult<MapScope> {
        MapScope::from_definitions("process", &self.variables, registry)
    }

    /// The generator input for `node`.
    pub fn task_spec(&self, node: &NodeDefinition) -> TaskSpec {
        TaskSpec {
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            process_id: self.id.clone(),
            package_name: self.package.clone(),
            work_parameters: node.parameters.clone(),
            io: node.io.clone(),
            metadata: node.metadata.clone(),
            incoming_connections: node.incoming.clone(),
        }
    }
}

impl NodeDefinition {
    /// Node-level variables with their types resolved.
    pub fn local_scope(&self, registry: &dyn TypeRegistry) -> CodegenResult<MapScope> {
        MapScope::from_definitions(&format!("node '{}'", self.id), &self.variables, registry)
    }
}

/// Parse a process definition YAML file.
pub fn parse_definition(path: &Path) -> Result<ProcessDefinition, LoadError> {
    let yaml_content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_definition_str(&yaml_content).map_err(|e| LoadError::Yaml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_definition_str(yaml: &str) -> Result<ProcessDefinition, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Result of generating one node of a process.
#[derive(Debug)]
pub struct NodeOutcome {
    pub node_id: String,
    pub node_name: String,
    pub ad_hoc: bool,
    pub result: CodegenResult<TaskModelArtifacts>,
}

/// Generate every node of `definition`, in node order.
///
/// A node that fails keeps its error and contributes no artifacts; the
/// remaining nodes are still generated. Only an invalid process scope fails
/// the whole call.
pub fn generate_process(
    definition: &ProcessDefinition,
    registry: &dyn TypeRegistry,
    templates: &TemplateCatalog,
    config: &CodegenConfig,
) -> CodegenResult<Vec<NodeOutcome>> {
    let process_scope = definition.process_scope(registry)?;

    let outcomes = definition
        .nodes
        .iter()
        .map(|node| {
            let spec = definition.task_spec(node);
            let mut ad_hoc = false;
            let result = node.local_scope(registry).and_then(|local| {
                let ctx = CodegenContext {
                    local: &local,
                    enclosing: &process_scope,
                    registry,
                    templates,
                    config,
                };
                let generator = TaskModelGenerator::new(&spec, ctx)?;
                ad_hoc = generator.is_ad_hoc();
                generator.generate()
            });

            match &result {
                Ok(artifacts) => info!(
                    process_id = %definition.id,
                    node_id = %node.id,
                    model = %artifacts.model.qualified_name,
                    ad_hoc,
                    "generated task model"
                ),
                Err(e) => warn!(
                    process_id = %definition.id,
                    node_id = %node.id,
                    error = %e,
                    "task model generation failed"
                ),
            }

            NodeOutcome {
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                ad_hoc,
                result,
            }
        })
        .collect();

    Ok(outcomes)
}
