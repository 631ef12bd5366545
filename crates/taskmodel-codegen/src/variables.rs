//! Variable scopes and field-source resolution.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CodegenError, CodegenResult};
use crate::types::{TypeDescriptor, TypeRegistry};

/// `#{expression}`: a source that points at another variable instead of
/// carrying a literal value.
static PARAMETER_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{[^\s}]+\}").expect("parameter reference pattern is valid"));

/// Framework-internal human task parameters, never synthesized as fields.
pub const RESERVED_TASK_PARAMETERS: &[&str] = &[
    "TaskName",
    "NodeName",
    "ActorId",
    "GroupId",
    "ExcludedOwnerId",
    "BusinessAdministratorId",
    "BusinessAdministratorGroupId",
    "Priority",
    "Comment",
    "Description",
    "Skippable",
    "Content",
    "Locale",
    "CreatedBy",
    "NotStartedReassign",
    "NotCompletedReassign",
    "NotStartedNotify",
    "NotCompletedNotify",
];

/// Whether a source expression is a parameter reference (`#{...}` anywhere).
pub fn is_parameter_reference(source: &str) -> bool {
    PARAMETER_REFERENCE.is_match(source)
}

/// The set of parameter names excluded from field synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedParameters {
    names: BTreeSet<String>,
}

impl Default for ReservedParameters {
    fn default() -> Self {
        Self {
            names: RESERVED_TASK_PARAMETERS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

impl ReservedParameters {
    /// Built-in names plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reserved = Self::default();
        reserved.names.extend(extra.into_iter().map(Into::into));
        reserved
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// A process or task variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub data_type: TypeDescriptor,
    pub value: Option<Value>,
}

impl Variable {
    pub fn new(name: impl Into<String>, data_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// Lookup of declared variables by name.
pub trait VariableScope: std::fmt::Debug {
    fn find_variable(&self, name: &str) -> Option<&Variable>;
}

/// A variable declaration as written in a process definition, before its
/// type is resolved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariableDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

/// A scope backed by an ordered map of variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapScope {
    variables: IndexMap<String, Variable>,
}

impl MapScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: Variable) -> &mut Self {
        self.variables.insert(variable.name.clone(), variable);
        self
    }

    pub fn with(mut self, variable: Variable) -> Self {
        self.insert(variable);
        self
    }

    /// Build a scope from declarations, resolving each type through the
    /// registry. `scope` names the scope in errors ("process", "node '3'").
    pub fn from_definitions(
        scope: &str,
        definitions: &[VariableDef],
        registry: &dyn TypeRegistry,
    ) -> CodegenResult<Self> {
        let mut resolved = Self::new();
        for def in definitions {
            let type_name = def.type_name.as_deref().unwrap_or_default();
            let data_type =
                registry
                    .resolve(type_name)
                    .ok_or_else(|| CodegenError::UnknownVariableType {
                        scope: scope.to_string(),
                        variable: def.name.clone(),
                        type_name: type_name.to_string(),
                    })?;
            resolved.insert(Variable {
                name: def.name.clone(),
                data_type,
                value: def.value.clone(),
            });
        }
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableScope for MapScope {
    fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }
}

/// The variable a field source resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    pub variable: Variable,
    /// `true` when no scope declared the source and the variable was built
    /// from the field's declared type.
    pub synthesized: bool,
}

/// Resolves field sources against a local scope, then the enclosing scope.
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    node_id: &'a str,
    local: &'a dyn VariableScope,
    enclosing: &'a dyn VariableScope,
    registry: &'a dyn TypeRegistry,
}

impl<'a> VariableResolver<'a> {
    pub fn new(
        node_id: &'a str,
        local: &'a dyn VariableScope,
        enclosing: &'a dyn VariableScope,
        registry: &'a dyn TypeRegistry,
    ) -> Self {
        Self {
            node_id,
            local,
            enclosing,
            registry,
        }
    }

    pub fn registry(&self) -> &'a dyn TypeRegistry {
        self.registry
    }

    /// Resolve `source` for `field`.
    ///
    /// Declared variables are returned as found. Otherwise a variable named
    /// after the field is synthesized from `declared_type`; when the source is
    /// not a parameter reference it is parsed as a literal of that type.
    pub fn resolve(
        &self,
        source: &str,
        field: &str,
        declared_type: Option<&str>,
    ) -> CodegenResult<ResolvedVariable> {
        if let Some(found) = self
            .local
            .find_variable(source)
            .or_else(|| self.enclosing.find_variable(source))
        {
            tracing::trace!(node_id = self.node_id, field, source, "source resolved to declared variable");
            return Ok(ResolvedVariable {
                variable: found.clone(),
                synthesized: false,
            });
        }

        let type_name = declared_type.unwrap_or_default();
        let data_type =
            self.registry
                .resolve(type_name)
                .ok_or_else(|| CodegenError::TypeResolution {
                    node_id: self.node_id.to_string(),
                    field: field.to_string(),
                    type_name: type_name.to_string(),
                })?;

        let mut variable = Variable::new(field, data_type);
        if !is_parameter_reference(source) {
            let value = variable.data_type.read_literal(source).map_err(|e| {
                CodegenError::LiteralParse {
                    node_id: self.node_id.to_string(),
                    field: field.to_string(),
                    raw: e.raw,
                    type_name: e.type_name,
                }
            })?;
            variable.value = Some(value);
        }

        Ok(ResolvedVariable {
            variable,
            synthesized: true,
        })
    }
}
