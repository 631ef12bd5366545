//! Generator configuration.
//!
//! Every field has a default so an empty `[codegen]` table (or none at all)
//! yields the standard work-item conventions.

use serde::{Deserialize, Serialize};

use crate::variables::ReservedParameters;

/// Settings shared by every generator of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CodegenConfig {
    /// Parameter names excluded in addition to the built-in reserved set.
    pub reserved_parameters: Vec<String>,
    /// Class-level marker carrying the task and process names.
    pub task_annotation: String,
    /// Field-level marker carrying the INPUT/OUTPUT classification.
    pub param_annotation: String,
    /// Variable holding the work item inside generated dispatch cases.
    pub work_item_variable: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            reserved_parameters: Vec::new(),
            task_annotation: "org.kie.kogito.UserTask".to_string(),
            param_annotation: "org.kie.kogito.UserTaskParam".to_string(),
            work_item_variable: "workItem".to_string(),
        }
    }
}

impl CodegenConfig {
    pub fn reserved(&self) -> ReservedParameters {
        ReservedParameters::with_extra(self.reserved_parameters.iter().cloned())
    }

    /// Import of the classification enum nested in the field marker.
    pub fn param_type_import(&self) -> String {
        format!("{}.ParamType", self.param_annotation)
    }

    pub fn task_annotation_name(&self) -> &str {
        simple_name(&self.task_annotation)
    }

    pub fn param_annotation_name(&self) -> &str {
        simple_name(&self.param_annotation)
    }
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        codegen: CodegenConfig,
    }

    #[test]
    fn test_defaults() {
        let config = CodegenConfig::default();
        assert_eq!(config.task_annotation_name(), "UserTask");
        assert_eq!(config.param_annotation_name(), "UserTaskParam");
        assert_eq!(
            config.param_type_import(),
            "org.kie.kogito.UserTaskParam.ParamType"
        );
        assert!(config.reserved().contains("ActorId"));
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
[codegen]
reserved-parameters = ["InternalTicket"]
work-item-variable = "wi"
"#,
        )
        .unwrap();
        let config = file.codegen;
        assert_eq!(config.work_item_variable, "wi");
        assert_eq!(config.task_annotation, "org.kie.kogito.UserTask");
        let reserved = config.reserved();
        assert!(reserved.contains("InternalTicket"));
        assert!(reserved.contains("TaskName"));
    }

    #[test]
    fn test_missing_table_is_default() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file.codegen, CodegenConfig::default());
    }
}
