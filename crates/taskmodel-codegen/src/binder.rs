//! Binding of the Model template to the generated Input and Output types.

use tracing::debug;

use crate::naming::ArtifactNames;
use crate::template::{CompilationUnit, Substitutions, TypeRef};

pub const INPUT_TOKEN: &str = "$TaskInput$";
pub const OUTPUT_TOKEN: &str = "$TaskOutput$";
pub const MODEL_TOKEN: &str = "$TaskModel$";

/// Rewrites generic bindings and placeholder tokens of the Model template.
#[derive(Debug, Clone, Copy)]
pub struct ModelBinder<'a> {
    names: &'a ArtifactNames,
}

impl<'a> ModelBinder<'a> {
    pub fn new(names: &'a ArtifactNames) -> Self {
        Self { names }
    }

    /// The three placeholder tokens mapped to qualified names.
    pub fn substitutions(&self) -> Substitutions {
        Substitutions::new()
            .insert(INPUT_TOKEN, &self.names.input.qualified_name)
            .insert(OUTPUT_TOKEN, &self.names.output.qualified_name)
            .insert(MODEL_TOKEN, &self.names.model.qualified_name)
    }

    /// Bind every generic implemented type to `<Input, Output>` and replace
    /// the tokens in all members. Non-generic implemented types are kept.
    pub fn bind(&self, unit: &mut CompilationUnit) {
        let arguments = vec![
            self.names.input.qualified_name.clone(),
            self.names.output.qualified_name.clone(),
        ];
        for implemented in &mut unit.class.implements {
            if !implemented.arguments.is_empty() {
                implemented.set_type_arguments(arguments.clone());
            }
        }

        let substitutions = self.substitutions();
        for type_ref in &mut unit.class.extends {
            substitute_type(type_ref, &substitutions);
        }
        for member in &mut unit.class.members {
            member.substitute(&substitutions);
        }
        debug!(
            model = %self.names.model.qualified_name,
            members = unit.class.members.len(),
            "bound model template"
        );
    }
}

fn substitute_type(type_ref: &mut TypeRef, substitutions: &Substitutions) {
    *type_ref = TypeRef::parse(&substitutions.apply(&type_ref.to_string()));
}
