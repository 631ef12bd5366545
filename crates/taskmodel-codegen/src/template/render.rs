//! Serialization of a [`CompilationUnit`] to Java source text.

use askama::Template;

use super::model::CompilationUnit;
use crate::error::{CodegenError, CodegenResult};

#[derive(Template, Debug)]
#[template(path = "java/compilation_unit.java", escape = "none")]
struct CompilationUnitTemplate<'a> {
    comments: &'a [String],
    package: &'a str,
    imports: &'a [String],
    annotations: &'a [String],
    declaration: String,
    members: Vec<Vec<String>>,
}

/// Render `unit` as source text ending in a single newline.
pub fn render_compilation_unit(unit: &CompilationUnit) -> CodegenResult<String> {
    let template = CompilationUnitTemplate {
        comments: &unit.comments,
        package: unit.package.as_deref().unwrap_or_default(),
        imports: &unit.imports,
        annotations: &unit.class.annotations,
        declaration: unit.class.declaration(),
        members: unit.class.members.iter().map(|m| m.lines()).collect(),
    };

    let rendered = template
        .render()
        .map_err(|e| CodegenError::Rendering(e.to_string()))?;
    Ok(format!("{}\n", rendered.trim()))
}
