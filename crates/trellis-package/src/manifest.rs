//! Package manifest (`package.json`) reading and package-root discovery

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use trellis_core::{Error, Result};

/// Manifest file name marking a package boundary
pub const MANIFEST_FILE: &str = "package.json";

/// Engine key holding the required trellis version range
pub const ENGINE_KEY: &str = "trellis";

/// The subset of a package manifest the CLI reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Entry point, relative to the package root
    #[serde(default)]
    pub main: Option<String>,

    /// Required host versions keyed by engine name
    #[serde(default)]
    pub engines: HashMap<String, String>,
}

impl PackageManifest {
    /// Read the manifest in `dir`
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::manifest_parse(path.display().to_string(), e))
    }

    /// Declared entry point, ignoring blank values
    pub fn entry(&self) -> Option<&str> {
        self.main.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// Version requirement on the trellis host, if declared
    pub fn engine_requirement(&self) -> Option<&str> {
        self.engines.get(ENGINE_KEY).map(String::as_str)
    }
}

/// Find the nearest ancestor of `start` (inclusive) containing a manifest
///
/// The walk stops after checking `stop_at` when given, otherwise at the
/// filesystem root.
pub fn find_package_root(start: &Path, stop_at: Option<&Path>) -> Option<PathBuf> {
    if !start.exists() {
        return None;
    }

    for dir in start.ancestors() {
        if dir.join(MANIFEST_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        if stop_at.is_some_and(|stop| dir == stop) {
            break;
        }
    }
    None
}
