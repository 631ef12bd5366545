//! Error taxonomy for task model generation.
//!
//! Every variant aborts generation of the node it was raised for; nothing in
//! this crate retries or emits partial artifacts.

use crate::template::TemplateKind;

/// Result alias used throughout the crate.
pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A template resource could not be read from its source.
    #[error("template {kind} is missing from '{location}': {reason}")]
    TemplateMissing {
        kind: TemplateKind,
        location: String,
        reason: String,
    },

    /// The template text has no class declaration to rewrite.
    #[error("cannot find class declaration in the {kind} template")]
    DeclarationRootNotFound { kind: TemplateKind },

    /// A fixed rewrite point (routine) is absent from the template.
    #[error("template {kind} has no '{anchor}' routine to rewrite")]
    MissingAnchor {
        kind: TemplateKind,
        anchor: &'static str,
    },

    /// The template could be located but not parsed (unbalanced braces, etc).
    #[error("malformed {kind} template: {reason}")]
    MalformedTemplate { kind: TemplateKind, reason: String },

    /// The task description cannot produce valid artifacts.
    #[error("invalid task '{node_id}': {reason}")]
    InvalidTask { node_id: String, reason: String },

    /// A declared type name does not resolve in the type registry.
    #[error("node '{node_id}': field '{field}' declares unknown type '{type_name}'")]
    TypeResolution {
        node_id: String,
        field: String,
        type_name: String,
    },

    /// A literal-looking source expression does not parse under its type.
    #[error("node '{node_id}': field '{field}' has literal '{raw}' that does not parse as {type_name}")]
    LiteralParse {
        node_id: String,
        field: String,
        raw: String,
        type_name: String,
    },

    /// A variable declared in a scope names an unknown type.
    #[error("{scope} variable '{variable}' declares unknown type '{type_name}'")]
    UnknownVariableType {
        scope: String,
        variable: String,
        type_name: String,
    },

    #[error("rendering failed: {0}")]
    Rendering(String),
}

impl CodegenError {
    /// Whether this error stems from template or generator setup rather than
    /// from the task's own declarations.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CodegenError::TemplateMissing { .. }
                | CodegenError::DeclarationRootNotFound { .. }
                | CodegenError::MissingAnchor { .. }
                | CodegenError::MalformedTemplate { .. }
                | CodegenError::InvalidTask { .. }
        )
    }
}
