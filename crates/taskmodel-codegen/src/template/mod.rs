//! Class templates: lookup, parsing and rendering.
//!
//! A [`TemplateCatalog`] resolves the skeleton source for each artifact kind,
//! either from the built-in resources, from a template directory, or from
//! in-memory overrides registered by callers (tests use these heavily).

mod model;
mod parser;
mod render;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CodegenError, CodegenResult};
use crate::naming::ArtifactKind;

pub use model::{
    ClassDecl, CompilationUnit, FieldDecl, Member, Parameter, Routine, Statement, Substitutions,
    TypeRef,
};
pub use render::render_compilation_unit;

const INPUT_TEMPLATE: &str = include_str!("../../templates/class-templates/TaskInputTemplate.java");
const OUTPUT_TEMPLATE: &str =
    include_str!("../../templates/class-templates/TaskOutputTemplate.java");
const MODEL_TEMPLATE: &str = include_str!("../../templates/class-templates/TaskModelTemplate.java");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Input,
    Output,
    Model,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [TemplateKind::Input, TemplateKind::Output, TemplateKind::Model];

    /// Resource file name, e.g. `TaskInputTemplate.java`.
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Input => "TaskInputTemplate.java",
            TemplateKind::Output => "TaskOutputTemplate.java",
            TemplateKind::Model => "TaskModelTemplate.java",
        }
    }

    fn builtin_source(self) -> &'static str {
        match self {
            TemplateKind::Input => INPUT_TEMPLATE,
            TemplateKind::Output => OUTPUT_TEMPLATE,
            TemplateKind::Model => MODEL_TEMPLATE,
        }
    }
}

impl From<ArtifactKind> for TemplateKind {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Input => TemplateKind::Input,
            ArtifactKind::Output => TemplateKind::Output,
            ArtifactKind::Model => TemplateKind::Model,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Where class templates come from.
///
/// Overrides win over the directory; a configured directory never falls back
/// to the built-in resources, so a missing file surfaces as
/// [`CodegenError::TemplateMissing`].
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    directory: Option<PathBuf>,
    overrides: HashMap<TemplateKind, String>,
}

impl TemplateCatalog {
    /// Catalog backed by the templates compiled into this crate.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Catalog reading `<dir>/Task*Template.java`.
    pub fn from_dir(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, kind: TemplateKind, source: impl Into<String>) -> Self {
        self.overrides.insert(kind, source.into());
        self
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Raw template text for `kind`.
    pub fn source(&self, kind: TemplateKind) -> CodegenResult<String> {
        if let Some(source) = self.overrides.get(&kind) {
            return Ok(source.clone());
        }
        match &self.directory {
            Some(dir) => {
                let path = dir.join(kind.file_name());
                std::fs::read_to_string(&path).map_err(|e| CodegenError::TemplateMissing {
                    kind,
                    location: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            None => Ok(kind.builtin_source().to_string()),
        }
    }

    /// Load and parse the template for `kind`.
    pub fn load(&self, kind: TemplateKind) -> CodegenResult<CompilationUnit> {
        let source = self.source(kind)?;
        debug!(template = %kind, bytes = source.len(), "parsing class template");
        parser::parse_compilation_unit(kind, &source)
    }
}
