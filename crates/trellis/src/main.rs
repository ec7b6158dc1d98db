//! Trellis CLI - scaffold projects from registry-distributed templates
//!
//! This is the main entry point for the Trellis command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trellis_core::config::DEFAULT_HOME_DIR;
use trellis_core::{CliConfig, ConfigLoader};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    if let Ok(loader) = &loader {
        preload_dotenv(loader);
    }

    let verbose = cli.debug || env_requests_debug();
    init_tracing(verbose, cli.quiet);

    match run(cli, loader).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            if verbose {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, loader: trellis_core::Result<ConfigLoader>) -> Result<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Version(args) => {
            let config = version_config(&cli, loader.ok().as_ref());
            commands::version::run(args, &config)
        }
        Commands::Init(args) => {
            let loader = loader?;
            let config = commands::prepare::run(&cli, &loader).await?;
            commands::exec::run(config, "init", args.to_argv()).await
        }
    }
}

/// Load `~/.env` before tracing starts so its log level applies
///
/// Failures are reported again when the configuration is built.
fn preload_dotenv(loader: &ConfigLoader) {
    if loader.user_home().exists() {
        let _ = loader.load_dotenv();
    }
}

/// Configuration shown by `trellis version`, falling back to defaults
fn version_config(cli: &Cli, loader: Option<&ConfigLoader>) -> CliConfig {
    let loaded = loader.map(ConfigLoader::load).transpose();
    let config = match loaded {
        Ok(Some(config)) => config,
        Ok(None) => CliConfig::with_home(DEFAULT_HOME_DIR),
        Err(e) => {
            debug!("Using default configuration: {}", e);
            CliConfig::with_home(DEFAULT_HOME_DIR)
        }
    };
    config.with_registry(cli.registry.clone())
}

fn env_requests_debug() -> bool {
    std::env::var("TRELLIS_LOG_LEVEL")
        .map(|level| matches!(level.as_str(), "debug" | "verbose" | "trace"))
        .unwrap_or(false)
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
