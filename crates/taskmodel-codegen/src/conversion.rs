//! Bodies of the map conversion routines (`fromMap` / `toMap`).

use crate::fields::{FieldDescriptor, ParamType};
use crate::naming::java_string_literal;
use crate::template::Statement;

/// Name of the generic map in both conversion directions.
pub const PARAMS_VAR: &str = "params";

#[derive(Debug, Clone, Copy)]
pub struct ConversionBuilder<'a> {
    fields: &'a [FieldDescriptor],
}

impl<'a> ConversionBuilder<'a> {
    pub fn new(fields: &'a [FieldDescriptor]) -> Self {
        Self { fields }
    }

    /// `X item = new X(); item.f = (T) params.get("f"); ... return item;`
    pub fn from_map_body(&self, class_name: &str, instance: &str, params: &str) -> Vec<Statement> {
        let mut body = Vec::with_capacity(self.fields.len() + 2);
        body.push(Statement::Local {
            type_name: class_name.to_string(),
            name: instance.to_string(),
            init: format!("new {class_name}()"),
        });
        for field in self.fields {
            body.push(Statement::Assign {
                target: format!("{instance}.{}", field.identifier),
                value: format!(
                    "({}) {params}.get({})",
                    field.type_name,
                    java_string_literal(&field.name)
                ),
            });
        }
        body.push(Statement::Return(instance.to_string()));
        body
    }

    /// `Map<String, Object> params = new HashMap<>(); params.put("f", this.f); ... return params;`
    ///
    /// Only OUTPUT descriptors are written to the map.
    pub fn to_map_body(&self) -> Vec<Statement> {
        let mut body = vec![Statement::Local {
            type_name: "Map<String, Object>".to_string(),
            name: PARAMS_VAR.to_string(),
            init: "new HashMap<>()".to_string(),
        }];
        body.extend(
            self.fields
                .iter()
                .filter(|field| field.param_type == ParamType::Output)
                .map(|field| {
                    Statement::Expression(format!(
                        "{PARAMS_VAR}.put({}, this.{})",
                        java_string_literal(&field.name),
                        field.identifier
                    ))
                }),
        );
        body.push(Statement::Return(PARAMS_VAR.to_string()));
        body
    }
}
