//! Plugin loading
//!
//! An installed command package declares an entry point in its manifest.
//! A [`CommandLoader`] turns that resolved path into a runnable
//! [`Command`]. The default [`ProcessLoader`] runs the entry point as a
//! child process: positionals are passed through and the options object is
//! handed over as `--options <json>`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as Process;
use tracing::{debug, info};
use trellis_core::{CliConfig, Error, Result};

use crate::args::CommandArgs;
use crate::lifecycle::Command;

/// A resolved command package ready to be loaded
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub command_name: String,
    pub package_name: String,
    pub package_version: String,

    /// Absolute path of the package's entry point
    pub entry_point: PathBuf,
}

/// Factory building commands from resolved entry points
pub trait CommandLoader: Send + Sync {
    fn load(&self, request: &LoadRequest) -> Result<Box<dyn Command>>;
}

/// Loads commands as child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessLoader {
    env: Vec<(String, String)>,
}

impl ProcessLoader {
    /// Loader exporting the CLI configuration to plugins
    pub fn new(config: &CliConfig) -> Self {
        let mut env = vec![
            (
                "TRELLIS_CLI_HOME_PATH".to_string(),
                config.home_path.display().to_string(),
            ),
            ("TRELLIS_REGISTRY".to_string(), config.registry.clone()),
            ("TRELLIS_LOG_LEVEL".to_string(), config.log_level.clone()),
            (
                "TRELLIS_MIN_VERSION".to_string(),
                config.min_runtime_version.clone(),
            ),
            (
                "TRELLIS_REQUEST_BASEURL".to_string(),
                config.request_base_url.clone(),
            ),
        ];
        if let Some(target) = &config.target_path {
            env.push((
                "TRELLIS_TARGET_PATH".to_string(),
                target.display().to_string(),
            ));
        }
        Self { env }
    }

    /// Variables exported to every plugin process
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }
}

impl CommandLoader for ProcessLoader {
    fn load(&self, request: &LoadRequest) -> Result<Box<dyn Command>> {
        debug!(
            "Loading {}@{} from {}",
            request.package_name,
            request.package_version,
            request.entry_point.display()
        );
        Ok(Box::new(ExternalCommand::new(
            &request.command_name,
            &request.entry_point,
            self.env.clone(),
        )))
    }
}

/// A command implemented by an executable entry point
#[derive(Debug)]
pub struct ExternalCommand {
    name: String,
    program: PathBuf,
    env: Vec<(String, String)>,
    args: Option<CommandArgs>,
}

impl ExternalCommand {
    pub fn new(name: &str, program: &Path, env: Vec<(String, String)>) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_path_buf(),
            env,
            args: None,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Process arguments for the given command arguments
    pub fn process_args(args: &CommandArgs) -> Vec<String> {
        let mut out = args.positionals.clone();
        out.push("--options".to_string());
        out.push(args.options.to_json());
        out
    }
}

#[async_trait]
impl Command for ExternalCommand {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&mut self, args: &CommandArgs) -> Result<()> {
        if !self.program.is_file() {
            return Err(Error::invalid_configuration(format!(
                "entry point {} does not exist",
                self.program.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&self.program)?.permissions().mode();
            if mode & 0o111 == 0 {
                return Err(Error::invalid_configuration(format!(
                    "entry point {} is not executable",
                    self.program.display()
                )));
            }
        }

        self.args = Some(args.clone());
        Ok(())
    }

    async fn exec(&mut self) -> Result<()> {
        let args = self.args.as_ref().ok_or_else(|| {
            Error::invalid_arguments(format!("command '{}' was not initialized", self.name))
        })?;

        info!("Running {} {}", self.name, self.program.display());
        let status = Process::new(&self.program)
            .args(Self::process_args(args))
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .await?;

        if !status.success() {
            return Err(Error::command_failed(
                &self.name,
                status.code().unwrap_or(-1),
            ));
        }

        Ok(())
    }
}
