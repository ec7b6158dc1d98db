//! Late-bound command dispatch
//!
//! The host version is checked against the configured minimum first. For a
//! mapped command the dispatcher then:
//! 1. builds a [`ManagedPackage`] in the shared store (or, with a target
//!    path override, points it at the local package directory),
//! 2. updates the package when a version is cached, otherwise installs it,
//! 3. resolves the entry point and loads it through a [`CommandLoader`],
//! 4. runs the loaded command through its lifecycle.
//!
//! Every invocation of a cache-backed command queries the registry for the
//! latest version. A target path override disables the store entirely and
//! never touches the registry.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trellis_command::{CommandLoader, CommandRunner, LoadRequest, ProcessLoader};
use trellis_core::{CliConfig, Result};
use trellis_package::{
    Installer, ManagedPackage, ManagedPackageOptions, RegistryInstaller, VersionResolver,
    VersionSource, LATEST,
};

use crate::registry::CommandRegistry;

/// What a dispatch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No package is mapped to the command
    NotMapped,

    /// The package declares no usable entry point
    Unavailable,

    /// The command ran to completion
    Executed { package: String, version: String },
}

/// Resolves, installs and runs registry-backed commands
pub struct Dispatcher {
    config: CliConfig,
    registry: CommandRegistry,
    resolver: Arc<dyn VersionSource>,
    installer: Arc<dyn Installer>,
    loader: Arc<dyn CommandLoader>,
}

impl Dispatcher {
    /// Dispatcher talking to the configured registry
    pub fn new(config: CliConfig) -> Result<Self> {
        let resolver = VersionResolver::new(&config)?;
        let installer = RegistryInstaller::new(resolver.clone());
        let loader = ProcessLoader::new(&config);

        Ok(Self {
            config,
            registry: CommandRegistry::builtin(),
            resolver: Arc::new(resolver),
            installer: Arc::new(installer),
            loader: Arc::new(loader),
        })
    }

    pub fn with_command_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_version_source(mut self, resolver: Arc<dyn VersionSource>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_installer(mut self, installer: Arc<dyn Installer>) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn CommandLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn command_registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch `command` with its argument list (options object last)
    ///
    /// The minimum runtime version is enforced before the registry or the
    /// store is touched.
    pub async fn run(&self, command: &str, argv: Vec<Value>) -> Result<DispatchOutcome> {
        CommandRunner::from_config(&self.config)?.check_runtime()?;

        let Some(package_name) = self.registry.lookup(command) else {
            debug!("No package mapped to '{}', nothing to dispatch", command);
            return Ok(DispatchOutcome::NotMapped);
        };

        let Some(package) = self.prepare_package(package_name).await? else {
            return Ok(DispatchOutcome::Unavailable);
        };

        let Some(entry_point) = package.entry_point_path()? else {
            warn!(
                "{}@{} declares no entry point, '{}' is unavailable",
                package.package_name(),
                package.package_version(),
                command
            );
            return Ok(DispatchOutcome::Unavailable);
        };
        debug!("Entry point: {}", entry_point.display());

        let manifest = package.manifest()?;
        let version = match manifest.as_ref().and_then(|m| m.version.clone()) {
            Some(v) if package.package_version() == LATEST => v,
            _ => package.package_version().to_string(),
        };

        let request = LoadRequest {
            command_name: command.to_string(),
            package_name: package_name.to_string(),
            package_version: version.clone(),
            entry_point,
        };
        let mut loaded = self.loader.load(&request)?;

        let mut runner = CommandRunner::from_config(&self.config)?.with_engine_requirement(
            manifest
                .as_ref()
                .and_then(|m| m.engine_requirement()),
        );
        runner.run(loaded.as_mut(), argv).await?;

        info!("{} finished ({}@{})", command, package_name, version);
        Ok(DispatchOutcome::Executed {
            package: package_name.to_string(),
            version,
        })
    }

    /// Build the package and bring it up to date
    ///
    /// Returns `None` when a target path override points at nothing.
    async fn prepare_package(&self, package_name: &str) -> Result<Option<ManagedPackage>> {
        if let Some(target_path) = &self.config.target_path {
            debug!("targetPath: {}", target_path.display());
            if !target_path.exists() {
                warn!(
                    "Target path {} does not exist, '{}' is unavailable",
                    target_path.display(),
                    package_name
                );
                return Ok(None);
            }

            let package = self.managed_package(ManagedPackageOptions {
                target_path: target_path.clone(),
                store_dir: None,
                package_name: package_name.to_string(),
                package_version: LATEST.to_string(),
            })?;
            return Ok(Some(package));
        }

        let target_path = self.config.dependencies_dir();
        let store_dir = self.config.store_dir();
        debug!("targetPath: {}", target_path.display());
        debug!("storeDir: {}", store_dir.display());

        let mut package = self.managed_package(ManagedPackageOptions {
            target_path,
            store_dir: Some(store_dir),
            package_name: package_name.to_string(),
            package_version: LATEST.to_string(),
        })?;

        if package.exists().await? {
            debug!("Updating {}", package_name);
            package.update().await?;
        } else {
            debug!("Installing {}", package_name);
            package.install().await?;
        }

        Ok(Some(package))
    }

    fn managed_package(&self, options: ManagedPackageOptions) -> Result<ManagedPackage> {
        ManagedPackage::new(options, self.resolver.clone(), self.installer.clone())
    }
}
