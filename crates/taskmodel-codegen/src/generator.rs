//! Per-node generation of the Input, Output and Model artifacts.
//!
//! A [`TaskModelGenerator`] is built for one task node and discarded after
//! use. Each `generate_*` call loads a fresh template, so generators share
//! nothing mutable and can run in parallel over one registry.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::binder::ModelBinder;
use crate::config::CodegenConfig;
use crate::conversion::{ConversionBuilder, PARAMS_VAR};
use crate::dispatch::DispatchEntry;
use crate::error::{CodegenError, CodegenResult};
use crate::fields::{FieldDescriptor, FieldSynthesizer, ParamType};
use crate::naming::{java_string_literal, ArtifactKind, ArtifactName, ArtifactNames};
use crate::template::{render_compilation_unit, CompilationUnit, TemplateCatalog, TemplateKind};
use crate::types::TypeRegistry;
use crate::variables::{ReservedParameters, VariableResolver, VariableScope};

/// Work parameter overriding the node name as the task's display name.
pub const TASK_NAME_PARAMETER: &str = "TaskName";

/// Node metadata flag marking a task as started automatically.
pub const CUSTOM_AUTO_START: &str = "customAutoStart";

/// Mapping between a task's parameters and process variables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IoSpec {
    /// Task input name to source expression.
    pub input_mapping: IndexMap<String, Option<String>>,
    pub input_types: IndexMap<String, String>,
    /// Task output name to the source expression it is written to.
    pub output_mapping: IndexMap<String, Option<String>>,
    pub output_types: IndexMap<String, String>,
}

/// Everything the generator reads about one task node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSpec {
    pub node_id: String,
    pub node_name: String,
    pub process_id: String,
    pub package_name: String,
    pub work_parameters: IndexMap<String, Value>,
    pub io: IoSpec,
    pub metadata: IndexMap<String, Value>,
    pub incoming_connections: Vec<String>,
}

/// Collaborators shared by the generators of one run.
#[derive(Debug, Clone, Copy)]
pub struct CodegenContext<'a> {
    /// Node-level variables, consulted first.
    pub local: &'a dyn VariableScope,
    /// Process-level variables.
    pub enclosing: &'a dyn VariableScope,
    pub registry: &'a dyn TypeRegistry,
    pub templates: &'a TemplateCatalog,
    pub config: &'a CodegenConfig,
}

/// Source text of one generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub simple_name: String,
    pub qualified_name: String,
    pub source: String,
}

impl GeneratedArtifact {
    fn new(kind: ArtifactKind, name: &ArtifactName, source: String) -> Self {
        Self {
            kind,
            simple_name: name.simple_name.clone(),
            qualified_name: name.qualified_name.clone(),
            source,
        }
    }

    pub fn relative_path(&self) -> String {
        format!("{}.java", self.qualified_name.replace('.', "/"))
    }
}

/// The complete output for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskModelArtifacts {
    pub input: GeneratedArtifact,
    pub output: GeneratedArtifact,
    pub model: GeneratedArtifact,
    pub dispatch: DispatchEntry,
}

impl TaskModelArtifacts {
    pub fn artifacts(&self) -> [&GeneratedArtifact; 3] {
        [&self.input, &self.output, &self.model]
    }
}

#[derive(Debug)]
pub struct TaskModelGenerator<'a> {
    spec: &'a TaskSpec,
    ctx: CodegenContext<'a>,
    names: ArtifactNames,
    reserved: ReservedParameters,
}

impl<'a> TaskModelGenerator<'a> {
    /// Build a generator for `spec`. Fails when the node id or package is
    /// empty, since neither can produce a valid qualified name.
    pub fn new(spec: &'a TaskSpec, ctx: CodegenContext<'a>) -> CodegenResult<Self> {
        if spec.node_id.trim().is_empty() {
            return Err(CodegenError::InvalidTask {
                node_id: spec.node_id.clone(),
                reason: "node id is empty".to_string(),
            });
        }
        if spec.package_name.trim().is_empty() {
            return Err(CodegenError::InvalidTask {
                node_id: spec.node_id.clone(),
                reason: "package name is empty".to_string(),
            });
        }

        Ok(Self {
            spec,
            ctx,
            names: ArtifactNames::derive(&spec.package_name, &spec.process_id, &spec.node_id),
            reserved: ctx.config.reserved(),
        })
    }

    pub fn names(&self) -> &ArtifactNames {
        &self.names
    }

    pub fn input_qualified_name(&self) -> &str {
        &self.names.input.qualified_name
    }

    pub fn output_qualified_name(&self) -> &str {
        &self.names.output.qualified_name
    }

    pub fn model_qualified_name(&self) -> &str {
        &self.names.model.qualified_name
    }

    /// `TaskName` work parameter when it is a string, else the node name.
    pub fn task_display_name(&self) -> &str {
        self.spec
            .work_parameters
            .get(TASK_NAME_PARAMETER)
            .and_then(Value::as_str)
            .unwrap_or(&self.spec.node_name)
    }

    pub fn node_name(&self) -> &str {
        &self.spec.node_name
    }

    pub fn node_id(&self) -> &str {
        &self.spec.node_id
    }

    /// A task is ad hoc when it is not flagged to auto-start and nothing
    /// connects into it.
    pub fn is_ad_hoc(&self) -> bool {
        let auto_start = match self.spec.metadata.get(CUSTOM_AUTO_START) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.trim().eq_ignore_ascii_case("true"),
            _ => false,
        };
        !auto_start && self.spec.incoming_connections.is_empty()
    }

    pub fn dispatch_entry(&self) -> DispatchEntry {
        DispatchEntry::new(
            &self.spec.node_id,
            &self.names.model.simple_name,
            &self.ctx.config.work_item_variable,
        )
    }

    /// Mapped inputs followed by static work parameters.
    pub fn input_fields(&self) -> CodegenResult<Vec<FieldDescriptor>> {
        let synthesizer = self.synthesizer();
        let mut fields = synthesizer.mapped_fields(
            &self.spec.io.input_mapping,
            &self.spec.io.input_types,
            ParamType::Input,
        )?;
        let extra = synthesizer.work_parameter_fields(&self.spec.work_parameters, &fields);
        fields.extend(extra);
        Ok(fields)
    }

    pub fn output_fields(&self) -> CodegenResult<Vec<FieldDescriptor>> {
        self.synthesizer().mapped_fields(
            &self.spec.io.output_mapping,
            &self.spec.io.output_types,
            ParamType::Output,
        )
    }

    pub fn generate_input(&self) -> CodegenResult<GeneratedArtifact> {
        let kind = ArtifactKind::Input;
        let name = &self.names.input;
        let mut unit = self.prepare(kind)?;
        self.annotate_task(&mut unit);

        let fields = self.input_fields()?;
        self.synthesizer().inject(&mut unit, &fields);

        let from_map = unit
            .class
            .routine_mut("fromMap")
            .filter(|routine| routine.is_static())
            .ok_or(CodegenError::MissingAnchor {
                kind: TemplateKind::Input,
                anchor: "fromMap",
            })?;
        let params = from_map.first_parameter().unwrap_or(PARAMS_VAR).to_string();
        from_map.set_return_type(&name.simple_name);
        from_map.set_body(ConversionBuilder::new(&fields).from_map_body(
            &name.simple_name,
            "item",
            &params,
        ));

        self.finish(kind, &unit)
    }

    pub fn generate_output(&self) -> CodegenResult<GeneratedArtifact> {
        let kind = ArtifactKind::Output;
        let name = &self.names.output;
        let mut unit = self.prepare(kind)?;
        self.annotate_task(&mut unit);

        let fields = self.output_fields()?;
        self.synthesizer().inject(&mut unit, &fields);
        let conversions = ConversionBuilder::new(&fields);

        let to_map = unit
            .class
            .routine_mut("toMap")
            .ok_or(CodegenError::MissingAnchor {
                kind: TemplateKind::Output,
                anchor: "toMap",
            })?;
        to_map.set_body(conversions.to_map_body());
        // The toMap body names both types unqualified.
        unit.add_import("java.util.Map");
        unit.add_import("java.util.HashMap");

        let from_map = unit
            .class
            .routine_mut("fromMap")
            .ok_or(CodegenError::MissingAnchor {
                kind: TemplateKind::Output,
                anchor: "fromMap",
            })?;
        let params = from_map.first_parameter().unwrap_or(PARAMS_VAR).to_string();
        from_map.set_return_type(&name.simple_name);
        from_map.set_body(conversions.from_map_body(&name.simple_name, "result", &params));

        self.finish(kind, &unit)
    }

    pub fn generate_model(&self) -> CodegenResult<GeneratedArtifact> {
        let kind = ArtifactKind::Model;
        let mut unit = self.prepare(kind)?;
        ModelBinder::new(&self.names).bind(&mut unit);
        self.finish(kind, &unit)
    }

    /// All three artifacts and the dispatch entry, or the first failure.
    pub fn generate(&self) -> CodegenResult<TaskModelArtifacts> {
        Ok(TaskModelArtifacts {
            input: self.generate_input()?,
            output: self.generate_output()?,
            model: self.generate_model()?,
            dispatch: self.dispatch_entry(),
        })
    }

    fn synthesizer(&self) -> FieldSynthesizer<'_> {
        FieldSynthesizer::new(
            VariableResolver::new(
                &self.spec.node_id,
                self.ctx.local,
                self.ctx.enclosing,
                self.ctx.registry,
            ),
            &self.reserved,
            self.ctx.config,
        )
    }

    /// Load the template for `kind`, set its package, header comment and
    /// class name.
    fn prepare(&self, kind: ArtifactKind) -> CodegenResult<CompilationUnit> {
        let mut unit = self.ctx.templates.load(kind.into())?;
        unit.set_package(&self.spec.package_name);
        unit.add_comment(format!(
            "Task {} for user task '{}' in process '{}'",
            kind.label(),
            self.spec.node_name,
            self.spec.process_id
        ));
        unit.class.name = self.names.get(kind).simple_name.clone();
        Ok(unit)
    }

    fn annotate_task(&self, unit: &mut CompilationUnit) {
        let config = self.ctx.config;
        unit.add_import(&config.task_annotation);
        unit.class.add_annotation(format!(
            "@{}(taskName = {}, processName = {})",
            config.task_annotation_name(),
            java_string_literal(self.task_display_name()),
            java_string_literal(&self.spec.process_id)
        ));
    }

    fn finish(&self, kind: ArtifactKind, unit: &CompilationUnit) -> CodegenResult<GeneratedArtifact> {
        let name = self.names.get(kind);
        let source = render_compilation_unit(unit)?;
        debug!(
            node_id = %self.spec.node_id,
            artifact = %name.qualified_name,
            bytes = source.len(),
            "generated artifact"
        );
        Ok(GeneratedArtifact::new(kind, name, source))
    }
}
