//! In-memory collaborators for ManagedPackage tests

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use trellis_core::Result;
use trellis_package::{InstallRequest, Installer, VersionSource};

use super::constants::*;

/// Version source with a mutable, fixed version list
#[derive(Debug, Default)]
pub struct StaticVersions {
    versions: Mutex<Vec<String>>,
    lookups: AtomicUsize,
}

impl StaticVersions {
    pub fn new(versions: &[&str]) -> Self {
        Self {
            versions: Mutex::new(versions.iter().map(|v| v.to_string()).collect()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Simulate a new version being published
    pub fn publish(&self, version: &str) {
        self.versions.lock().unwrap().push(version.to_string());
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionSource for StaticVersions {
    async fn list_versions(&self, _package_name: &str) -> Vec<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.versions.lock().unwrap().clone()
    }
}

/// Installer that lays down a manifest and records every request
#[derive(Debug, Default)]
pub struct CountingInstaller {
    installed: Mutex<Vec<String>>,
}

impl CountingInstaller {
    pub fn calls(&self) -> usize {
        self.installed.lock().unwrap().len()
    }

    pub fn installed_versions(&self) -> Vec<String> {
        self.installed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for CountingInstaller {
    async fn install(&self, request: &InstallRequest<'_>) -> Result<PathBuf> {
        self.installed
            .lock()
            .unwrap()
            .push(request.version.to_string());

        let dir = request.destination();
        std::fs::create_dir_all(dir.join("bin"))?;
        std::fs::write(dir.join("package.json"), MANIFEST_CONTENT)?;
        std::fs::write(dir.join(ENTRY_FILE), ENTRY_CONTENT)?;
        Ok(dir)
    }
}
