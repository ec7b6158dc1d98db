//! trellis-init - entry point of the `@trellis-cli/init` command package
//!
//! Started by the Trellis CLI as `trellis-init [projectName] --options <json>`
//! with the CLI configuration exported through `TRELLIS_*` variables.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trellis_command::{CommandRunner, PluginArgs};
use trellis_core::{ConfigLoader, Result};
use trellis_init::{DialoguerPrompter, InitCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = PluginArgs::parse();

    let level = std::env::var("TRELLIS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let verbose = matches!(level.as_str(), "debug" | "verbose" | "trace");
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::new(if verbose { "debug" } else { "info" }))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("✗").red().bold(), e);
            if verbose {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: PluginArgs) -> Result<()> {
    let config = ConfigLoader::new()?.load()?;
    let argv = args.into_argv()?;

    let mut command = InitCommand::new(config.clone(), Box::new(DialoguerPrompter))?;
    let mut runner = CommandRunner::from_config(&config)?;
    runner.run(&mut command, argv).await
}
