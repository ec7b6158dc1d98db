//! A registry package backing a dynamically dispatched command
//!
//! A [`ManagedPackage`] is either cache-backed (installed versions live in
//! the shared store, one directory per version) or installed directly into a
//! target path. The version starts out as [`LATEST`] and becomes concrete the
//! first time the package is prepared.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use trellis_core::{format_path, Error, Result};
use walkdir::WalkDir;

use crate::cache::PackageCache;
use crate::installer::{InstallRequest, Installer};
use crate::manifest::{find_package_root, PackageManifest};
use crate::resolver::VersionSource;

/// Placeholder version resolved against the registry on first use
pub const LATEST: &str = "latest";

/// Construction options for a [`ManagedPackage`]
#[derive(Debug, Clone, Default)]
pub struct ManagedPackageOptions {
    /// Install directory for uncached packages
    pub target_path: PathBuf,

    /// Shared store; `None` disables caching
    pub store_dir: Option<PathBuf>,

    pub package_name: String,

    /// Concrete version or `latest`; empty means `latest`
    pub package_version: String,
}

/// Package lifecycle: resolve, check, install, update, locate entry point
pub struct ManagedPackage {
    target_path: PathBuf,
    store_dir: Option<PathBuf>,
    package_name: String,
    package_version: String,
    resolver: Arc<dyn VersionSource>,
    installer: Arc<dyn Installer>,
}

impl std::fmt::Debug for ManagedPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPackage")
            .field("target_path", &self.target_path)
            .field("store_dir", &self.store_dir)
            .field("package_name", &self.package_name)
            .field("package_version", &self.package_version)
            .finish_non_exhaustive()
    }
}

impl ManagedPackage {
    /// Create a package from validated options
    pub fn new(
        options: ManagedPackageOptions,
        resolver: Arc<dyn VersionSource>,
        installer: Arc<dyn Installer>,
    ) -> Result<Self> {
        if options.package_name.trim().is_empty() {
            return Err(Error::invalid_configuration(
                "packageName is required for a managed package",
            ));
        }
        if options.store_dir.is_none() && options.target_path.as_os_str().is_empty() {
            return Err(Error::invalid_configuration(
                "targetPath is required when no store directory is configured",
            ));
        }

        let package_version = if options.package_version.trim().is_empty() {
            LATEST.to_string()
        } else {
            options.package_version
        };

        Ok(Self {
            target_path: options.target_path,
            store_dir: options.store_dir,
            package_name: options.package_name,
            package_version,
            resolver,
            installer,
        })
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Current version, `latest` until prepared
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn store_dir(&self) -> Option<&Path> {
        self.store_dir.as_deref()
    }

    pub fn is_cached(&self) -> bool {
        self.store_dir.is_some()
    }

    /// Cache directory of the current version, `None` when not cache-backed
    pub fn cache_file_path(&self) -> Option<PathBuf> {
        self.store_dir
            .as_deref()
            .map(|store| PackageCache::cache_path(store, &self.package_name, &self.package_version))
    }

    /// Directory the current version is (or would be) installed in
    pub fn package_dir(&self) -> PathBuf {
        self.cache_file_path()
            .unwrap_or_else(|| self.target_path.clone())
    }

    /// Ensure the store exists and pin `latest` to a concrete version
    pub async fn prepare(&mut self) -> Result<()> {
        if let Some(store) = &self.store_dir {
            PackageCache::ensure_store_dir(store)?;
        }

        if self.package_version == LATEST {
            let version = self.resolver.latest_version(&self.package_name).await?;
            debug!("Resolved {}@latest to {}", self.package_name, version);
            self.package_version = version;
        }

        Ok(())
    }

    /// Whether the current version is installed
    pub async fn exists(&mut self) -> Result<bool> {
        self.prepare().await?;
        let path = self.package_dir();
        let exists = PackageCache::exists(&path);
        debug!("{} exists: {}", path.display(), exists);
        Ok(exists)
    }

    /// Install the current version
    pub async fn install(&mut self) -> Result<PathBuf> {
        self.prepare().await?;
        let request = self.request(&self.package_version);
        self.installer.install(&request).await
    }

    /// Move to the registry's latest version, installing it if not cached
    pub async fn update(&mut self) -> Result<()> {
        self.prepare().await?;

        let latest = self.resolver.latest_version(&self.package_name).await?;
        let request = self.request(&latest);
        let destination = request.destination();

        if PackageCache::exists(&destination) {
            debug!(
                "{}@{} already installed at {}",
                self.package_name,
                latest,
                destination.display()
            );
        } else {
            info!(
                "Updating {} from {} to {}",
                self.package_name, self.package_version, latest
            );
            self.installer.install(&request).await?;
        }

        self.package_version = latest;
        Ok(())
    }

    /// Absolute path of the declared entry point
    ///
    /// Looks for the nearest manifest from the package root upwards (bounded
    /// by the store for cache-backed packages) and resolves its `main`.
    /// Returns `None` when there is no manifest or no entry declared. Never
    /// installs anything.
    pub fn entry_point_path(&self) -> Result<Option<PathBuf>> {
        let start = self.package_dir();
        let Some(root) = find_package_root(&start, self.store_dir.as_deref()) else {
            debug!("No package manifest found from {}", start.display());
            return Ok(None);
        };

        let manifest = PackageManifest::read(&root)?;
        let Some(entry) = manifest.entry() else {
            debug!("Manifest in {} declares no entry point", root.display());
            return Ok(None);
        };

        let path = std::path::absolute(root.join(entry))?;
        Ok(Some(format_path(&path)))
    }

    /// Manifest of the installed package
    pub fn manifest(&self) -> Result<Option<PackageManifest>> {
        let start = self.package_dir();
        match find_package_root(&start, self.store_dir.as_deref()) {
            Some(root) => PackageManifest::read(&root).map(Some),
            None => Ok(None),
        }
    }

    /// Copy a sub-directory of the installed package into `destination`
    ///
    /// Existing files in `destination` are overwritten. Returns the number of
    /// files copied.
    pub fn copy_to(&self, sub_dir: &str, destination: &Path) -> Result<usize> {
        let source = self.package_dir().join(sub_dir);
        if !source.is_dir() {
            return Err(Error::install(
                &self.package_name,
                &self.package_version,
                format!("package has no {} directory", sub_dir),
            ));
        }

        let mut copied = 0;
        for entry in WalkDir::new(&source).min_depth(1) {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(&source)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let out = destination.join(relative);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&out)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(entry.path(), &out)?;
                copied += 1;
            }
        }

        debug!(
            "Copied {} files from {} to {}",
            copied,
            source.display(),
            destination.display()
        );
        Ok(copied)
    }

    fn request<'a>(&'a self, version: &'a str) -> InstallRequest<'a> {
        InstallRequest {
            target_path: &self.target_path,
            store_dir: self.store_dir.as_deref(),
            package_name: &self.package_name,
            version,
        }
    }
}
