//! Hierarchical CLI configuration
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Dotenv file (~/.env), never overriding variables already set
//! 3. Config file (<home>/config.yaml)
//! 4. Environment variables (TRELLIS_* prefix)
//! 5. CLI flags (handled by caller through the `with_*` builders)
//!
//! The resulting [`CliConfig`] is immutable once built and is shared by
//! reference with every component that needs paths or registry settings.

use crate::error::{Error, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Public registry used when nothing else is configured
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// Mirror registry for regions where the public registry is slow
pub const MIRROR_REGISTRY: &str = "https://registry.npmmirror.com/";

/// Home directory name under the user's home
pub const DEFAULT_HOME_DIR: &str = ".trellis";

/// Directory under the CLI home holding command packages
pub const DEPENDENCIES_DIR: &str = "dependencies";

/// Directory under the CLI home holding template packages
pub const TEMPLATES_DIR: &str = "templates";

/// Store directory name inside a package root
pub const STORE_DIR: &str = "node_modules";

/// Immutable CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// CLI home (cache root)
    pub home_path: PathBuf,

    /// Local command package override; disables caching when set
    #[serde(default)]
    pub target_path: Option<PathBuf>,

    /// Registry base URL
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Lowest CLI version allowed to run commands
    #[serde(default = "default_min_runtime_version")]
    pub min_runtime_version: String,

    /// Log level (info, debug, ...)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URL of the template catalogue service
    #[serde(default = "default_request_base_url")]
    pub request_base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Partial configuration as written in `config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct FileConfig {
    target_path: Option<PathBuf>,
    registry: Option<String>,
    min_runtime_version: Option<String>,
    log_level: Option<String>,
    request_base_url: Option<String>,
    http_timeout_secs: Option<u64>,
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}
fn default_min_runtime_version() -> String {
    "0.1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_request_base_url() -> String {
    "https://api.trellis.dev/trellis".to_string()
}
fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!(
        "trellis/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

impl CliConfig {
    /// Defaults rooted at the given CLI home
    pub fn with_home(home_path: impl Into<PathBuf>) -> Self {
        Self {
            home_path: home_path.into(),
            target_path: None,
            registry: default_registry(),
            min_runtime_version: default_min_runtime_version(),
            log_level: default_log_level(),
            request_base_url: default_request_base_url(),
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }

    /// Override the local command package path
    pub fn with_target_path(mut self, target_path: Option<PathBuf>) -> Self {
        if target_path.is_some() {
            self.target_path = target_path;
        }
        self
    }

    /// Override the registry base URL
    pub fn with_registry(mut self, registry: Option<String>) -> Self {
        if let Some(registry) = registry {
            self.registry = registry;
        }
        self
    }

    /// Override the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Directory holding command packages
    pub fn dependencies_dir(&self) -> PathBuf {
        self.home_path.join(DEPENDENCIES_DIR)
    }

    /// Shared store for command packages
    pub fn store_dir(&self) -> PathBuf {
        self.dependencies_dir().join(STORE_DIR)
    }

    /// Directory holding template packages
    pub fn templates_dir(&self) -> PathBuf {
        self.home_path.join(TEMPLATES_DIR)
    }

    /// Shared store for template packages
    pub fn template_store_dir(&self) -> PathBuf {
        self.templates_dir().join(STORE_DIR)
    }

    /// Whether verbose diagnostics were requested
    pub fn is_verbose(&self) -> bool {
        matches!(self.log_level.as_str(), "debug" | "verbose" | "trace")
    }

    /// Parsed minimum runtime version
    pub fn min_version(&self) -> Result<Version> {
        Version::parse(&self.min_runtime_version).map_err(|e| {
            Error::invalid_configuration(format!(
                "min-runtime-version '{}' is not valid semver: {}",
                self.min_runtime_version, e
            ))
        })
    }
}

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// User home directory (for ~/.env and the default CLI home)
    user_home: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the current user
    pub fn new() -> Result<Self> {
        let user_home =
            crate::utils::get_home_dir().map_err(|e| Error::invalid_configuration(e.to_string()))?;
        Ok(Self::with_user_home(user_home))
    }

    /// Create a loader with a custom user home
    pub fn with_user_home(user_home: PathBuf) -> Self {
        Self { user_home }
    }

    /// The user home this loader resolves against
    pub fn user_home(&self) -> &Path {
        &self.user_home
    }

    /// Load `~/.env` into the process environment
    ///
    /// Variables that are already set keep their values. A missing file is
    /// not an error.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self.user_home.join(".env");
        if !env_path.exists() {
            return Ok(());
        }

        debug!("Loading environment from {}", env_path.display());
        dotenvy::from_path(&env_path).map_err(|e| {
            Error::invalid_configuration(format!("Failed to read {}: {}", env_path.display(), e))
        })
    }

    /// Build the configuration
    pub fn load(&self) -> Result<CliConfig> {
        if !self.user_home.exists() {
            return Err(Error::invalid_configuration(format!(
                "User home directory does not exist: {}",
                self.user_home.display()
            )));
        }

        let home_path = match env::var("TRELLIS_CLI_HOME_PATH") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.user_home.join(DEFAULT_HOME_DIR),
        };

        let mut config = CliConfig::with_home(home_path);

        let config_file = config.home_path.join("config.yaml");
        if config_file.exists() {
            let content = fs::read_to_string(&config_file)?;
            let file_config: FileConfig = serde_yaml_ng::from_str(&content).map_err(|e| {
                Error::invalid_configuration(format!(
                    "Failed to parse {}: {}",
                    config_file.display(),
                    e
                ))
            })?;
            config = Self::merge_file_config(config, file_config);
        }

        config = Self::apply_env_overrides(config)?;

        // Fail early on a bad minimum version rather than at command time
        config.min_version()?;

        Ok(config)
    }

    /// Overlay values present in the config file
    fn merge_file_config(mut base: CliConfig, overlay: FileConfig) -> CliConfig {
        if overlay.target_path.is_some() {
            base.target_path = overlay.target_path;
        }
        if let Some(registry) = overlay.registry {
            base.registry = registry;
        }
        if let Some(version) = overlay.min_runtime_version {
            base.min_runtime_version = version;
        }
        if let Some(level) = overlay.log_level {
            base.log_level = level;
        }
        if let Some(url) = overlay.request_base_url {
            base.request_base_url = url;
        }
        if let Some(timeout) = overlay.http_timeout_secs {
            base.http_timeout_secs = timeout;
        }
        base
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: CliConfig) -> Result<CliConfig> {
        if let Ok(val) = env::var("TRELLIS_TARGET_PATH") {
            if !val.is_empty() {
                config.target_path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("TRELLIS_REGISTRY") {
            if !val.is_empty() {
                config.registry = val;
            }
        }

        if let Ok(val) = env::var("TRELLIS_MIN_VERSION") {
            config.min_runtime_version = val;
        }

        if let Ok(val) = env::var("TRELLIS_LOG_LEVEL") {
            config.log_level = val;
        }

        if let Ok(val) = env::var("TRELLIS_REQUEST_BASEURL") {
            config.request_base_url = val;
        }

        if let Ok(val) = env::var("TRELLIS_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_configuration("TRELLIS_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        Ok(config)
    }
}
