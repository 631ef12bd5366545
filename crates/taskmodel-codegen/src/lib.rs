//! Typed task model synthesis for work-item nodes.
//!
//! For one task node this crate produces three Java classes (a typed Input
//! holder, a typed Output holder with map conversions, and a Model binding the
//! two) plus one dispatch-table entry that builds the Model from a work item.
//!
//! # Modules
//!
//! - [`naming`]: Deterministic artifact names from process id, node id and kind
//! - [`types`]: Type registry: declared type names and runtime values to type descriptors
//! - [`variables`]: Variable scopes and field-source resolution
//! - [`template`]: Class template catalog, parsing and rendering
//! - [`fields`]: Field descriptors and their injection into templates
//! - [`conversion`]: `fromMap` / `toMap` routine bodies
//! - [`binder`]: Model template generic binding and token substitution
//! - [`dispatch`]: Dispatch switch entries
//! - [`generator`]: Per-node generator tying the above together
//! - [`loader`]: YAML process definitions and whole-process generation
//! - [`config`]: Generator settings

pub mod binder;
pub mod config;
pub mod conversion;
pub mod dispatch;
pub mod error;
pub mod fields;
pub mod generator;
pub mod loader;
pub mod naming;
pub mod template;
pub mod types;
pub mod variables;

pub use config::CodegenConfig;
pub use dispatch::DispatchEntry;
pub use error::{CodegenError, CodegenResult};
pub use fields::{FieldDescriptor, ParamType};
pub use generator::{
    CodegenContext, GeneratedArtifact, IoSpec, TaskModelArtifacts, TaskModelGenerator, TaskSpec,
};
pub use loader::{generate_process, parse_definition, LoadError, NodeOutcome, ProcessDefinition};
pub use naming::{ArtifactKind, ArtifactName, ArtifactNames};
pub use template::{TemplateCatalog, TemplateKind};
pub use types::{StandardTypeRegistry, TypeDescriptor, TypeRegistry};
pub use variables::{MapScope, Variable, VariableResolver, VariableScope};
