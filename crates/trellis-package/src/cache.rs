//! Version-keyed package cache layout
//!
//! Every installed version lives in its own directory under the store:
//!
//! ```text
//! <store>/_<normalized-name>@<version>@<raw-name>/
//! ```
//!
//! Encoding both the normalized and the raw name keeps scoped packages that
//! normalize to the same string apart, and lets several versions of one
//! package sit side by side.

use std::path::{Path, PathBuf};
use trellis_core::Result;

/// Cache path computations for the shared package store
pub struct PackageCache;

impl PackageCache {
    /// Replace path separators in a package name
    pub fn normalize(package_name: &str) -> String {
        package_name.replace(['/', '\\'], "_")
    }

    /// Cache key for a name and version
    pub fn cache_key(package_name: &str, version: &str) -> String {
        format!("{}@{}", Self::normalize(package_name), version)
    }

    /// Directory an installed version lives in
    ///
    /// Pure computation, no filesystem access.
    pub fn cache_path(store_dir: &Path, package_name: &str, version: &str) -> PathBuf {
        store_dir.join(format!(
            "_{}@{}",
            Self::cache_key(package_name, version),
            package_name
        ))
    }

    /// Create the store directory tree if absent
    pub fn ensure_store_dir(store_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(store_dir)?;
        Ok(())
    }

    /// Whether a path exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}
