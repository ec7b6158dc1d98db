//! Shared utility functions for Trellis crates

use anyhow::anyhow;
use std::path::{Path, PathBuf};

/// Get the user's home directory
///
/// The HOME environment variable wins over dirs::home_dir() so that
/// container setups with a remapped HOME resolve the same directory the
/// shell does.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Normalize path separators to the platform separator
///
/// Manifests written on Windows may declare `lib\\index`; on unix hosts
/// those separators are rewritten to `/`.
pub fn format_path(path: &Path) -> PathBuf {
    if std::path::MAIN_SEPARATOR == '/' {
        PathBuf::from(path.to_string_lossy().replace('\\', "/"))
    } else {
        path.to_path_buf()
    }
}
