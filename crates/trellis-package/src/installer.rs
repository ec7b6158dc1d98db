//! Package installation from the registry
//!
//! Downloads a version's tarball, verifies its integrity string when the
//! registry publishes one, and extracts it so the package root (the tarball's
//! `package/` directory) becomes a standalone directory with its own manifest.
//!
//! Cache-backed installs are published atomically: the tarball is extracted
//! into a hidden staging directory inside the store and renamed into place.
//! When two invocations race on the same version, the loser discards its copy.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use base64::Engine;
use flate2::read::GzDecoder;
use sha2::{Digest, Sha512};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::{debug, info, warn};
use trellis_core::{Error, Result};

use crate::cache::PackageCache;
use crate::resolver::VersionResolver;

/// What to install and where
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Install directory when no store is configured
    pub target_path: &'a Path,

    /// Shared versioned store
    pub store_dir: Option<&'a Path>,

    pub package_name: &'a str,

    /// Concrete version (never `latest`)
    pub version: &'a str,
}

impl InstallRequest<'_> {
    /// Directory the package ends up in
    pub fn destination(&self) -> PathBuf {
        match self.store_dir {
            Some(store) => PackageCache::cache_path(store, self.package_name, self.version),
            None => self.target_path.to_path_buf(),
        }
    }
}

/// Fetches a package version and materializes it on disk
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install and return the package directory
    async fn install(&self, request: &InstallRequest<'_>) -> Result<PathBuf>;
}

/// Installer backed by an npm-compatible registry
#[derive(Debug, Clone)]
pub struct RegistryInstaller {
    resolver: VersionResolver,
}

impl RegistryInstaller {
    /// Create an installer sharing the resolver's registry and HTTP client
    pub fn new(resolver: VersionResolver) -> Self {
        Self { resolver }
    }

    async fn fetch_tarball(&self, request: &InstallRequest<'_>) -> anyhow::Result<bytes::Bytes> {
        let metadata = self.resolver.fetch_metadata(request.package_name).await?;
        let entry = metadata.version(request.version).ok_or_else(|| {
            anyhow!(
                "version {} is not published on {}",
                request.version,
                self.resolver.registry()
            )
        })?;

        if entry.dist.tarball.is_empty() {
            bail!("registry metadata has no tarball URL");
        }

        debug!("Downloading tarball from: {}", entry.dist.tarball);
        let response = self
            .resolver
            .client()
            .get(&entry.dist.tarball)
            .send()
            .await
            .context("Failed to send download request")?;

        if !response.status().is_success() {
            bail!("Download failed with status: {}", response.status());
        }

        let content = response
            .bytes()
            .await
            .context("Failed to read tarball body")?;

        verify_integrity(&content, request.package_name, entry.dist.integrity.as_deref())?;
        Ok(content)
    }

    fn publish(&self, content: &[u8], request: &InstallRequest<'_>) -> anyhow::Result<PathBuf> {
        let destination = request.destination();

        let Some(store) = request.store_dir else {
            std::fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create {}", destination.display()))?;
            extract_package(content, &destination)?;
            return Ok(destination);
        };

        PackageCache::ensure_store_dir(store)?;
        let staging = tempfile::Builder::new()
            .prefix(".trellis-install-")
            .tempdir_in(store)
            .context("Failed to create staging directory")?;
        extract_package(content, staging.path())?;

        if destination.exists() {
            debug!(
                "{} was published concurrently, discarding staged copy",
                destination.display()
            );
            return Ok(destination);
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let staged = staging.keep();
        if let Err(e) = std::fs::rename(&staged, &destination) {
            let _ = std::fs::remove_dir_all(&staged);
            if !destination.exists() {
                return Err(e).with_context(|| {
                    format!("Failed to move package into {}", destination.display())
                });
            }
        }

        Ok(destination)
    }
}

#[async_trait]
impl Installer for RegistryInstaller {
    async fn install(&self, request: &InstallRequest<'_>) -> Result<PathBuf> {
        info!("Installing {}@{}", request.package_name, request.version);

        let content = self
            .fetch_tarball(request)
            .await
            .map_err(|e| Error::install(request.package_name, request.version, format!("{:#}", e)))?;

        let destination = self
            .publish(&content, request)
            .map_err(|e| Error::install(request.package_name, request.version, format!("{:#}", e)))?;

        info!(
            "Installed {}@{} to {}",
            request.package_name,
            request.version,
            destination.display()
        );
        Ok(destination)
    }
}

/// Verify downloaded content against a subresource-integrity string
///
/// Only `sha512-` digests are checked. A missing or unsupported integrity
/// string logs a warning and passes.
pub fn verify_integrity(
    content: &[u8],
    package_name: &str,
    integrity: Option<&str>,
) -> anyhow::Result<()> {
    let expected = integrity.and_then(|value| {
        value
            .split_whitespace()
            .find_map(|part| part.strip_prefix("sha512-"))
    });

    match expected {
        Some(expected) => {
            let actual = base64::engine::general_purpose::STANDARD.encode(Sha512::digest(content));
            if actual != expected {
                bail!(
                    "Integrity check failed for '{}': expected sha512-{}, got sha512-{}",
                    package_name,
                    expected,
                    actual
                );
            }
            debug!("Package '{}' passed integrity check", package_name);
        }
        None => {
            warn!(
                "No sha512 integrity published for '{}', skipping verification",
                package_name
            );
        }
    }

    Ok(())
}

/// Extract a gzipped package tarball into `destination`
///
/// The first path component (`package/` for registry tarballs) is stripped.
/// Entries that would land outside `destination` and link entries are
/// rejected.
pub fn extract_package(content: &[u8], destination: &Path) -> anyhow::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(content));

    for entry in archive.entries().context("Failed to read tarball")? {
        let mut entry = entry.context("Corrupt tarball entry")?;
        let entry_type = entry.header().entry_type();
        let path = entry.path().context("Invalid entry path")?.into_owned();

        if entry_type.is_symlink() || entry_type.is_hard_link() {
            warn!("Skipping link entry {}", path.display());
            continue;
        }

        let relative: PathBuf = path.components().skip(1).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("Tarball entry escapes package root: {}", path.display());
        }

        let out = destination.join(&relative);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&out)
            .with_context(|| format!("Failed to extract {}", relative.display()))?;
    }

    Ok(())
}
