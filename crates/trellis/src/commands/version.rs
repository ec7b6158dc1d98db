//! Version command
//!
//! Reports the running build together with where it is published and the
//! runtime floor commands are dispatched under.

use anyhow::Result;
use serde::Serialize;
use trellis_core::{CliConfig, VERSION};
use trellis_exec::CORE_PACKAGE;

use crate::cli::VersionArgs;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,

    /// Registry package the CLI is published as
    pub package: String,

    /// Registry queried for commands and self-update checks
    pub registry: String,

    /// Minimum host version enforced before dispatch
    pub min_runtime_version: String,

    pub commit: Option<String>,
    pub build_date: Option<String>,
    pub target: Option<String>,
}

impl VersionInfo {
    pub fn new(config: &CliConfig) -> Self {
        Self {
            version: VERSION.to_string(),
            package: CORE_PACKAGE.to_string(),
            registry: config.registry.clone(),
            min_runtime_version: config.min_runtime_version.clone(),
            commit: option_env!("GIT_SHA").map(String::from),
            build_date: option_env!("BUILD_DATE").map(String::from),
            target: option_env!("TARGET").map(String::from),
        }
    }

    /// One-line summary, e.g. `@trellis-cli/core 0.3.0 (abc1234)`
    pub fn summary(&self) -> String {
        match &self.commit {
            Some(commit) => format!("{} {} ({})", self.package, self.version, commit),
            None => format!("{} {}", self.package, self.version),
        }
    }
}

pub fn run(args: &VersionArgs, config: &CliConfig) -> Result<()> {
    let info = VersionInfo::new(config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.summary());
    println!("Registry: {}", info.registry);
    println!("Minimum runtime: {}", info.min_runtime_version);
    if let Some(target) = &info.target {
        println!("Target: {}", target);
    }
    if let Some(date) = &info.build_date {
        println!("Build date: {}", date);
    }

    Ok(())
}
