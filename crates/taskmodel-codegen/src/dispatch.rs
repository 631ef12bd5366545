//! Dispatch-table entries mapping node ids to model factories.

use crate::naming::java_string_literal;

/// One `case` of a per-process dispatch switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// External node id the switch matches on.
    pub match_key: String,
    pub model_simple_name: String,
    pub work_item_var: String,
}

impl DispatchEntry {
    pub fn new(
        match_key: impl Into<String>,
        model_simple_name: impl Into<String>,
        work_item_var: impl Into<String>,
    ) -> Self {
        Self {
            match_key: match_key.into(),
            model_simple_name: model_simple_name.into(),
            work_item_var: work_item_var.into(),
        }
    }

    /// `Model.from(workItem)`
    pub fn factory_expression(&self) -> String {
        format!("{}.from({})", self.model_simple_name, self.work_item_var)
    }

    pub fn body(&self) -> String {
        format!("return {};", self.factory_expression())
    }

    /// `case "3": return Model.from(workItem);`
    pub fn render_case(&self) -> String {
        format!("case {}: {}", java_string_literal(&self.match_key), self.body())
    }
}
