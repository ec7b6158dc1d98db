//! Startup checks run before any command

use anyhow::Result;
use semver::Version;
use tracing::debug;
use trellis_command::CommandRunner;
use trellis_core::{CliConfig, ConfigLoader, Error, VERSION};
use trellis_exec::CORE_PACKAGE;
use trellis_package::{VersionResolver, VersionSource};

use crate::cli::Cli;
use crate::output;

/// Print the version, verify the environment and build the configuration
pub async fn run(cli: &Cli, loader: &ConfigLoader) -> Result<CliConfig> {
    output::info(&format!("trellis {}", VERSION));

    if !loader.user_home().exists() {
        return Err(Error::invalid_configuration(format!(
            "User home directory does not exist: {}",
            loader.user_home().display()
        ))
        .into());
    }

    loader.load_dotenv()?;

    let mut config = loader
        .load()?
        .with_target_path(cli.target_path.clone())
        .with_registry(cli.registry.clone());
    if cli.debug {
        config = config.with_log_level("debug");
    }
    debug!("CLI home: {}", config.home_path.display());

    CommandRunner::from_config(&config)?.check_runtime()?;

    if let Some(latest) = check_cli_update(&config).await {
        output::warning(&format!(
            "trellis {} is available (current version {}), please update",
            latest, VERSION
        ));
    }

    Ok(config)
}

/// Newer published CLI version, if any
///
/// Registry failures are logged and read as "no update".
pub async fn check_cli_update(config: &CliConfig) -> Option<String> {
    let resolver = match VersionResolver::new(config) {
        Ok(resolver) => resolver,
        Err(e) => {
            debug!("Skipping update check: {}", e);
            return None;
        }
    };

    match resolver.latest_version(CORE_PACKAGE).await {
        Ok(latest) => newer_than(&latest, VERSION).then_some(latest),
        Err(e) => {
            debug!("Update check failed: {}", e);
            None
        }
    }
}

fn newer_than(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Ok(candidate), Ok(current)) => candidate > current,
        _ => false,
    }
}
