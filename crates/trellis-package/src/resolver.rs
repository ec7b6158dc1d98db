//! Registry version resolution
//!
//! Talks to an npm-compatible registry: one GET of `<registry>/<name>` returns
//! a metadata document whose `versions` object is keyed by version string.
//! Listing never fails; an unreachable registry or a non-success status
//! reads as "no versions". Picking the latest version is the only place a
//! hard [`Error::VersionResolution`] is raised.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use trellis_core::{CliConfig, Error, Result, DEFAULT_REGISTRY};

/// Source of published versions for a package
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// All published versions, or an empty list when the registry cannot answer
    async fn list_versions(&self, package_name: &str) -> Vec<String>;

    /// The highest published version by semantic-version precedence
    async fn latest_version(&self, package_name: &str) -> Result<String> {
        let versions = self.list_versions(package_name).await;
        latest_of(package_name, &versions)
    }
}

/// Select the highest version by semantic-version precedence
///
/// Build metadata is ignored and versions of equal precedence keep their
/// input order. Strings that are not valid semver are skipped.
pub fn latest_of(package_name: &str, versions: &[String]) -> Result<String> {
    let mut parsed: Vec<(Version, &String)> = versions
        .iter()
        .filter_map(|raw| match Version::parse(raw) {
            Ok(v) => Some((v, raw)),
            Err(e) => {
                debug!("Ignoring version '{}' of {}: {}", raw, package_name, e);
                None
            }
        })
        .collect();

    parsed.sort_by(|a, b| b.0.cmp_precedence(&a.0));

    parsed
        .first()
        .map(|(_, raw)| (*raw).clone())
        .ok_or_else(|| Error::version_resolution(package_name))
}

/// Registry metadata document for one package
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "dist-tags")]
    pub dist_tags: HashMap<String, String>,

    /// Per-version documents in publish order
    #[serde(default)]
    pub versions: Map<String, Value>,
}

/// Per-version metadata
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    #[serde(default)]
    pub name: Option<String>,

    pub version: String,

    #[serde(default)]
    pub main: Option<String>,

    pub dist: DistInfo,
}

/// Download location and checksums for a version
#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    pub tarball: String,

    #[serde(default)]
    pub shasum: Option<String>,

    /// Subresource-integrity string, e.g. `sha512-<base64>`
    #[serde(default)]
    pub integrity: Option<String>,
}

impl PackageMetadata {
    /// Version strings in document order
    pub fn version_names(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Parsed metadata for one version
    pub fn version(&self, version: &str) -> Option<VersionEntry> {
        let value = self.versions.get(version)?;
        match serde_json::from_value(value.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Malformed metadata for version {}: {}", version, e);
                None
            }
        }
    }
}

/// Registry client resolving package versions
#[derive(Debug, Clone)]
pub struct VersionResolver {
    client: reqwest::Client,
    registry: String,
}

impl VersionResolver {
    /// Create a resolver from CLI configuration
    pub fn new(config: &CliConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| {
                Error::invalid_configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            registry: config.registry.clone(),
        })
    }

    /// Create a resolver for a registry with a default HTTP client
    pub fn with_registry(registry: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry: registry.into(),
        }
    }

    /// Registry base URL
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Metadata URL for a package on a registry
    pub fn metadata_url(registry: &str, package_name: &str) -> String {
        let base = if registry.is_empty() {
            DEFAULT_REGISTRY
        } else {
            registry
        };
        if base.ends_with('/') {
            format!("{}{}", base, package_name)
        } else {
            format!("{}/{}", base, package_name)
        }
    }

    /// Fetch the metadata document from the configured registry
    pub async fn fetch_metadata(&self, package_name: &str) -> anyhow::Result<PackageMetadata> {
        self.fetch_metadata_from(&self.registry, package_name).await
    }

    /// Fetch the metadata document from a specific registry
    pub async fn fetch_metadata_from(
        &self,
        registry: &str,
        package_name: &str,
    ) -> anyhow::Result<PackageMetadata> {
        let url = Self::metadata_url(registry, package_name);
        debug!("Fetching package metadata from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach registry at {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Registry returned HTTP {} for {}",
                response.status(),
                package_name
            ));
        }

        response
            .json::<PackageMetadata>()
            .await
            .with_context(|| format!("Failed to parse registry metadata for {}", package_name))
    }

    /// List versions from an alternate registry (e.g. a mirror)
    pub async fn list_versions_from(&self, registry: &str, package_name: &str) -> Vec<String> {
        match self.fetch_metadata_from(registry, package_name).await {
            Ok(metadata) => metadata.version_names(),
            Err(e) => {
                debug!("No versions for {}: {:#}", package_name, e);
                Vec::new()
            }
        }
    }

    /// Latest version from an alternate registry
    pub async fn latest_version_from(&self, registry: &str, package_name: &str) -> Result<String> {
        let versions = self.list_versions_from(registry, package_name).await;
        latest_of(package_name, &versions)
    }
}

#[async_trait]
impl VersionSource for VersionResolver {
    async fn list_versions(&self, package_name: &str) -> Vec<String> {
        self.list_versions_from(&self.registry, package_name).await
    }
}
