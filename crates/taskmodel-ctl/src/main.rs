//! `taskmodel-ctl`: generate typed task models from process definitions.

mod cli_config;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "taskmodel-ctl",
    version,
    about = "Generate typed input, output and model classes for work-item task nodes",
    styles = output::clap_styles()
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the task model classes of a process definition
    Generate {
        /// Process definition YAML file
        #[arg(short, long)]
        definition: PathBuf,

        /// Output source root (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding Task{Input,Output,Model}Template.java overrides
        #[arg(short, long, env = "TASKMODEL_TEMPLATES")]
        templates: Option<PathBuf>,

        /// Only generate the node with this id
        #[arg(short, long)]
        node: Option<String>,
    },
    /// Generate every node in memory and report failures
    Check {
        /// Process definition YAML file
        #[arg(short, long)]
        definition: PathBuf,

        /// Directory holding Task{Input,Output,Model}Template.java overrides
        #[arg(short, long, env = "TASKMODEL_TEMPLATES")]
        templates: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "taskmodel=debug"
    } else {
        "taskmodel=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = cli_config::load_cli_config();

    match cli.command {
        Commands::Generate {
            definition,
            output,
            templates,
            node,
        } => commands::handle_generate_command(
            &config,
            &definition,
            output.as_deref(),
            templates.as_deref(),
            node.as_deref(),
        )?,
        Commands::Check {
            definition,
            templates,
        } => commands::handle_check_command(&config, &definition, templates.as_deref())?,
    }

    Ok(())
}
