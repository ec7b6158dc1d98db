//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Trellis - scaffold projects from registry-distributed templates
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Run commands from a local package directory instead of the registry
    #[arg(long, global = true)]
    pub target_path: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, global = true)]
    pub registry: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a project
    Init(InitArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the project to create
    pub project_name: Option<String>,

    /// Create the project even if the current directory is not empty
    #[arg(short, long)]
    pub force: bool,
}

impl InitArgs {
    /// Argument list handed to the command package, options last
    pub fn to_argv(&self) -> Vec<Value> {
        let mut argv: Vec<Value> = self
            .project_name
            .iter()
            .map(|name| Value::String(name.clone()))
            .collect();
        argv.push(json!({ "force": self.force }));
        argv
    }
}

#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
