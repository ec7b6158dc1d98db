//! Project details and working-directory checks

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;
use trellis_core::Result;

static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+([-_][a-zA-Z][a-zA-Z0-9]*|[a-zA-Z0-9])*[a-zA-Z0-9]$")
        .expect("project name regex is valid")
});

/// Version offered when the user gives none
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

/// What is being scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Project,
    Component,
}

impl ProjectType {
    pub const ALL: [ProjectType; 2] = [ProjectType::Project, ProjectType::Component];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Project => "Project",
            ProjectType::Component => "Component",
        }
    }
}

/// Answers collected for a new project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub template_key: String,
    pub project_name: String,
    pub description: String,
    pub version: String,
}

/// Letters first, letters or digits last, single `-`/`_` separators
/// followed by a letter
pub fn validate_project_name(name: &str) -> bool {
    PROJECT_NAME_RE.is_match(name)
}

/// Normalized semantic version, or `None` when invalid
///
/// Surrounding whitespace and a leading `v` or `=` are accepted.
pub fn validate_version(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed);
    semver::Version::parse(trimmed).ok().map(|v| v.to_string())
}

/// Whether a directory has no entries apart from hidden ones
pub fn is_dir_empty(path: &Path) -> Result<bool> {
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with('.') {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove everything inside a directory, keeping the directory itself
pub fn empty_dir(path: &Path) -> Result<()> {
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
