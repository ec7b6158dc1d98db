//! Command lifecycle
//!
//! Every command moves through a fixed sequence of stages:
//!
//! ```text
//! Constructed -> VersionChecked -> ArgsInitialized -> Initialized -> Executed
//! ```
//!
//! A failing stage stops the chain. The runner never retries and never
//! re-enters a command that already ran.

use async_trait::async_trait;
use semver::{Version, VersionReq};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use trellis_core::{CliConfig, Error, Result, VERSION};

use crate::args::{split_args, CommandArgs};

/// A dispatchable command
///
/// `init` and `exec` must be provided by every concrete command; the default
/// implementations fail with [`Error::NotImplemented`].
#[async_trait]
pub trait Command: Send {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Command-specific setup from the split arguments
    async fn init(&mut self, _args: &CommandArgs) -> Result<()> {
        Err(Error::not_implemented(self.name(), "init"))
    }

    /// Command-specific behavior
    async fn exec(&mut self) -> Result<()> {
        Err(Error::not_implemented(self.name(), "exec"))
    }
}

/// Lifecycle position of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleStage {
    Constructed,
    VersionChecked,
    ArgsInitialized,
    Initialized,
    Executed,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStage::Constructed => "constructed",
            LifecycleStage::VersionChecked => "version-checked",
            LifecycleStage::ArgsInitialized => "args-initialized",
            LifecycleStage::Initialized => "initialized",
            LifecycleStage::Executed => "executed",
        };
        write!(f, "{}", name)
    }
}

/// Drives one command through its lifecycle
#[derive(Debug)]
pub struct CommandRunner {
    host_version: Version,
    min_version: Version,
    engine_requirement: Option<String>,
    stage: LifecycleStage,
}

impl CommandRunner {
    /// Runner for the running CLI version
    pub fn new(min_version: Version) -> Result<Self> {
        let host_version = Version::parse(VERSION).map_err(|e| {
            Error::invalid_configuration(format!("CLI version '{}' is not semver: {}", VERSION, e))
        })?;

        Ok(Self {
            host_version,
            min_version,
            engine_requirement: None,
            stage: LifecycleStage::Constructed,
        })
    }

    /// Runner using the configured minimum version
    pub fn from_config(config: &CliConfig) -> Result<Self> {
        Self::new(config.min_version()?)
    }

    /// Override the host version (plugins report the host's version)
    pub fn with_host_version(mut self, version: Version) -> Self {
        self.host_version = version;
        self
    }

    /// Additional requirement declared by the command's package
    pub fn with_engine_requirement(mut self, requirement: Option<&str>) -> Self {
        self.engine_requirement = requirement.map(str::to_string);
        self
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    /// Fail when the host is older than the minimum or outside the engine range
    pub fn check_runtime(&self) -> Result<()> {
        if self.host_version < self.min_version {
            return Err(Error::unsupported_runtime(
                self.host_version.to_string(),
                self.min_version.to_string(),
            ));
        }

        if let Some(requirement) = &self.engine_requirement {
            let req = VersionReq::parse(requirement).map_err(|e| {
                Error::invalid_configuration(format!(
                    "engine requirement '{}' is invalid: {}",
                    requirement, e
                ))
            })?;
            if !req.matches(&self.host_version) {
                return Err(Error::unsupported_runtime(
                    self.host_version.to_string(),
                    requirement.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Run every stage in order
    pub async fn run(&mut self, command: &mut dyn Command, argv: Vec<Value>) -> Result<()> {
        if self.stage != LifecycleStage::Constructed {
            return Err(Error::invalid_configuration(format!(
                "command '{}' already reached stage {}",
                command.name(),
                self.stage
            )));
        }

        self.check_runtime()?;
        self.advance(command.name(), LifecycleStage::VersionChecked);

        let args = split_args(argv)?;
        self.advance(command.name(), LifecycleStage::ArgsInitialized);

        command.init(&args).await?;
        self.advance(command.name(), LifecycleStage::Initialized);

        command.exec().await?;
        self.advance(command.name(), LifecycleStage::Executed);

        Ok(())
    }

    fn advance(&mut self, name: &str, stage: LifecycleStage) {
        debug!("Command '{}': {} -> {}", name, self.stage, stage);
        self.stage = stage;
    }
}
