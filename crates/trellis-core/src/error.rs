//! Error types for trellis-core

use thiserror::Error;

/// Result type alias using trellis-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Trellis
#[derive(Error, Debug)]
pub enum Error {
    /// Bad constructor input or configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The registry returned no usable versions
    #[error("Check for updates failed: no versions published for {package}")]
    VersionResolution { package: String },

    /// Fetching or materializing a package failed
    #[error("Failed to install {package}@{version}: {message}")]
    Install {
        package: String,
        version: String,
        message: String,
    },

    /// Host version below the configured minimum
    #[error("trellis requires at least version {minimum}, current version is {current}")]
    UnsupportedRuntime { current: String, minimum: String },

    /// A command is missing a required lifecycle method
    #[error("Command '{command}' must implement {method}()")]
    NotImplemented { command: String, method: String },

    /// Command arguments are missing or malformed
    #[error("Invalid command arguments: {message}")]
    InvalidArguments { message: String },

    /// An external command exited unsuccessfully
    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// Package manifest could not be read
    #[error("Invalid package manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// An HTTP request to a service other than the registry failed
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Interactive input could not be read
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// The template catalogue has no entry for a key
    #[error("Template not found: {key}")]
    TemplateNotFound { key: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a version resolution error
    pub fn version_resolution(package: impl Into<String>) -> Self {
        Self::VersionResolution {
            package: package.into(),
        }
    }

    /// Create an install error
    pub fn install(
        package: impl Into<String>,
        version: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Install {
            package: package.into(),
            version: version.into(),
            message: message.to_string(),
        }
    }

    /// Create an unsupported runtime error
    pub fn unsupported_runtime(current: impl Into<String>, minimum: impl Into<String>) -> Self {
        Self::UnsupportedRuntime {
            current: current.into(),
            minimum: minimum.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(command: impl Into<String>, method: impl Into<String>) -> Self {
        Self::NotImplemented {
            command: command.into(),
            method: method.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, code: i32) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
        }
    }

    /// Create a manifest parse error
    pub fn manifest_parse(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a request error
    pub fn request(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl std::fmt::Display) -> Self {
        Self::Prompt {
            message: message.to_string(),
        }
    }

    /// Create a template not found error
    pub fn template_not_found(key: impl Into<String>) -> Self {
        Self::TemplateNotFound { key: key.into() }
    }
}
