//! Field synthesis for the Input and Output artifacts.
//!
//! The descriptor list built here drives both the field declarations and the
//! conversion routines, so the two always agree on order and membership.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CodegenConfig;
use crate::error::CodegenResult;
use crate::naming::{capitalize, sanitize_identifier};
use crate::template::{CompilationUnit, FieldDecl, Member, Parameter, Routine, Statement};
use crate::variables::{ReservedParameters, VariableResolver};

/// Classification carried by each field's marker annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Input,
    Output,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::Input => "INPUT",
            ParamType::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Parameter name, used as the map key in conversions.
    pub name: String,
    /// Java identifier of the field.
    pub identifier: String,
    /// Canonical type name, used for the declaration and the cast.
    pub type_name: String,
    pub param_type: ParamType,
    /// Value known at generation time, if any.
    pub literal_default: Option<Value>,
    /// Mapping source expression; `None` for static work parameters.
    pub source: Option<String>,
}

impl FieldDescriptor {
    /// `getAmount` / `setAmount` suffix.
    pub fn accessor_suffix(&self) -> String {
        capitalize(&self.identifier)
    }
}

/// Builds field descriptors for one node and injects them into templates.
#[derive(Debug, Clone, Copy)]
pub struct FieldSynthesizer<'a> {
    resolver: VariableResolver<'a>,
    reserved: &'a ReservedParameters,
    config: &'a CodegenConfig,
}

impl<'a> FieldSynthesizer<'a> {
    pub fn new(
        resolver: VariableResolver<'a>,
        reserved: &'a ReservedParameters,
        config: &'a CodegenConfig,
    ) -> Self {
        Self {
            resolver,
            reserved,
            config,
        }
    }

    /// Descriptors for an io mapping, in mapping order. Reserved names and
    /// entries without a source are skipped.
    pub fn mapped_fields(
        &self,
        mapping: &IndexMap<String, Option<String>>,
        types: &IndexMap<String, String>,
        param_type: ParamType,
    ) -> CodegenResult<Vec<FieldDescriptor>> {
        let mut fields = Vec::with_capacity(mapping.len());
        for (name, source) in mapping {
            let Some(source) = source else {
                continue;
            };
            if self.reserved.contains(name) {
                continue;
            }

            let resolved =
                self.resolver
                    .resolve(source, name, types.get(name).map(String::as_str))?;
            let literal_default = if resolved.synthesized {
                resolved.variable.value
            } else {
                None
            };

            fields.push(FieldDescriptor {
                name: name.clone(),
                identifier: sanitize_identifier(name),
                type_name: resolved.variable.data_type.type_name().to_string(),
                param_type,
                literal_default,
                source: Some(source.clone()),
            });
        }
        Ok(fields)
    }

    /// INPUT descriptors for static work parameters, typed by their value.
    /// Null values, reserved names and names already in `existing` are skipped.
    pub fn work_parameter_fields(
        &self,
        parameters: &IndexMap<String, Value>,
        existing: &[FieldDescriptor],
    ) -> Vec<FieldDescriptor> {
        let registry = self.resolver.registry();
        let mut fields = Vec::new();
        for (name, value) in parameters {
            if value.is_null() || self.reserved.contains(name) {
                continue;
            }
            if existing.iter().chain(fields.iter()).any(|f: &FieldDescriptor| &f.name == name) {
                warn!(parameter = %name, "work parameter shadows a mapped input, skipping");
                continue;
            }
            fields.push(FieldDescriptor {
                name: name.clone(),
                identifier: sanitize_identifier(name),
                type_name: registry.from_runtime_value(value).type_name().to_string(),
                param_type: ParamType::Input,
                literal_default: Some(value.clone()),
                source: None,
            });
        }
        fields
    }

    /// Append a marked private field plus getter and setter per descriptor.
    pub fn inject(&self, unit: &mut CompilationUnit, fields: &[FieldDescriptor]) {
        if fields.is_empty() {
            return;
        }
        unit.add_import(&self.config.param_annotation);
        unit.add_import(&self.config.param_type_import());

        for field in fields {
            debug!(
                field = %field.name,
                type_name = %field.type_name,
                param_type = %field.param_type,
                "synthesized task field"
            );
            let mut decl = FieldDecl::private(&field.type_name, &field.identifier);
            decl.annotations.push(format!(
                "@{}(value = ParamType.{})",
                self.config.param_annotation_name(),
                field.param_type
            ));
            unit.class.add_member(Member::Field(decl));
            unit.class.add_member(Member::Routine(getter(field)));
            unit.class.add_member(Member::Routine(setter(field)));
        }
    }
}

fn getter(field: &FieldDescriptor) -> Routine {
    Routine::method(
        &["public"],
        &field.type_name,
        format!("get{}", field.accessor_suffix()),
        Vec::new(),
        vec![Statement::Return(field.identifier.clone())],
    )
}

fn setter(field: &FieldDescriptor) -> Routine {
    Routine::method(
        &["public"],
        "void",
        format!("set{}", field.accessor_suffix()),
        vec![Parameter::new(&field.type_name, &field.identifier)],
        vec![Statement::Assign {
            target: format!("this.{}", field.identifier),
            value: field.identifier.clone(),
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateCatalog;
    use crate::template::TemplateKind;
    use crate::types::{StandardTypeRegistry, TypeDescriptor};
    use crate::variables::{MapScope, Variable};
    use serde_json::json;

    struct Fixture {
        local: MapScope,
        process: MapScope,
        registry: StandardTypeRegistry,
        reserved: ReservedParameters,
        config: CodegenConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                local: MapScope::new().with(Variable::new("orderTotal", TypeDescriptor::double())),
                process: MapScope::new().with(Variable::new("customer", TypeDescriptor::text())),
                registry: StandardTypeRegistry::new(),
                reserved: ReservedParameters::default(),
                config: CodegenConfig::default(),
            }
        }

        fn synthesizer(&self) -> FieldSynthesizer<'_> {
            FieldSynthesizer::new(
                VariableResolver::new("7", &self.local, &self.process, &self.registry),
                &self.reserved,
                &self.config,
            )
        }
    }

    fn mapping(entries: &[(&str, Option<&str>)]) -> IndexMap<String, Option<String>> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_mapped_fields_follow_mapping_order() {
        let fixture = Fixture::new();
        let types: IndexMap<String, String> =
            [("count".to_string(), "Integer".to_string())].into_iter().collect();
        let fields = fixture
            .synthesizer()
            .mapped_fields(
                &mapping(&[
                    ("amount", Some("orderTotal")),
                    ("ActorId", Some("#{owner}")),
                    ("who", Some("customer")),
                    ("skipped", None),
                    ("count", Some("12")),
                ]),
                &types,
                ParamType::Input,
            )
            .unwrap();

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["amount", "who", "count"]);
        assert_eq!(fields[0].type_name, "java.lang.Double");
        assert_eq!(fields[0].literal_default, None);
        assert_eq!(fields[1].type_name, "java.lang.String");
        assert_eq!(fields[2].type_name, "java.lang.Integer");
        assert_eq!(fields[2].literal_default, Some(json!(12)));
    }

    #[test]
    fn test_reference_source_has_no_literal() {
        let fixture = Fixture::new();
        let types: IndexMap<String, String> =
            [("note".to_string(), "String".to_string())].into_iter().collect();
        let fields = fixture
            .synthesizer()
            .mapped_fields(&mapping(&[("note", Some("#{order.note}"))]), &types, ParamType::Output)
            .unwrap();
        assert_eq!(fields[0].literal_default, None);
        assert_eq!(fields[0].param_type, ParamType::Output);
    }

    #[test]
    fn test_work_parameters() {
        let fixture = Fixture::new();
        let parameters: IndexMap<String, Value> = [
            ("priority", json!(5)),
            ("TaskName", json!("Approve")),
            ("nothing", Value::Null),
            ("amount", json!(1.5)),
            ("big", json!(10_000_000_000_i64)),
            ("class", json!("reserved word")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let existing = vec![FieldDescriptor {
            name: "amount".to_string(),
            identifier: "amount".to_string(),
            type_name: "java.lang.Double".to_string(),
            param_type: ParamType::Input,
            literal_default: None,
            source: Some("orderTotal".to_string()),
        }];

        let fields = fixture
            .synthesizer()
            .work_parameter_fields(&parameters, &existing);
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.identifier.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("priority", "priority", "java.lang.Integer"),
                ("big", "big", "java.lang.Long"),
                ("class", "class_", "java.lang.String"),
            ]
        );
        assert!(fields.iter().all(|f| f.param_type == ParamType::Input));
        assert_eq!(fields[0].literal_default, Some(json!(5)));
    }

    #[test]
    fn test_inject_adds_marked_field_and_accessors() {
        let fixture = Fixture::new();
        let mut unit = TemplateCatalog::builtin().load(TemplateKind::Input).unwrap();
        let before = unit.class.members.len();
        let field = FieldDescriptor {
            name: "first-name".to_string(),
            identifier: "first_name".to_string(),
            type_name: "java.lang.String".to_string(),
            param_type: ParamType::Input,
            literal_default: None,
            source: Some("#{name}".to_string()),
        };
        fixture.synthesizer().inject(&mut unit, &[field]);

        assert_eq!(unit.class.members.len(), before + 3);
        let decl = unit.class.fields().next().unwrap();
        assert_eq!(
            decl.annotations,
            vec!["@UserTaskParam(value = ParamType.INPUT)"]
        );
        assert_eq!(decl.name, "first_name");
        assert!(unit.class.routine("getFirst_name").is_some());
        let setter = unit.class.routine("setFirst_name").unwrap();
        assert_eq!(
            setter.signature(),
            "public void setFirst_name(java.lang.String first_name)"
        );
        assert!(unit
            .imports
            .contains(&"org.kie.kogito.UserTaskParam.ParamType".to_string()));
    }

    #[test]
    fn test_inject_without_fields_leaves_imports() {
        let fixture = Fixture::new();
        let mut unit = TemplateCatalog::builtin().load(TemplateKind::Input).unwrap();
        let imports = unit.imports.clone();
        fixture.synthesizer().inject(&mut unit, &[]);
        assert_eq!(unit.imports, imports);
    }
}
