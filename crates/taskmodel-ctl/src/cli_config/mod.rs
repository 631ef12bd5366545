//! CLI configuration: generator settings and developer defaults.

pub(crate) mod loader;

pub(crate) use loader::{expand_path, load_cli_config};

use serde::Deserialize;
use taskmodel_codegen::CodegenConfig;

/// Contents of `.taskmodel.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Template directory used when `--templates` is not given.
    pub templates_dir: Option<String>,

    /// Output directory used when `--output` is not given.
    pub default_output_dir: Option<String>,

    /// User classes accepted as declared field and variable types.
    #[serde(default)]
    pub custom_types: Vec<String>,

    #[serde(default)]
    pub codegen: CodegenConfig,
}
