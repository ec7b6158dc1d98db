//! Template catalogue client

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use trellis_core::{CliConfig, Error, Result};

/// Catalogue entry describing one template package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    /// Stable identifier used for selection
    pub key: String,

    /// Display name
    pub name: String,

    pub package_name: String,

    /// Version to install, a concrete version or `latest`
    #[serde(default)]
    pub version: String,
}

/// Client for the `/template` endpoint of the Trellis API
#[derive(Debug, Clone)]
pub struct TemplateCatalogue {
    client: reqwest::Client,
    base_url: String,
}

impl TemplateCatalogue {
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
            base_url: config.request_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self) -> String {
        format!("{}/template", self.base_url.trim_end_matches('/'))
    }

    /// Fetch every available template
    pub async fn fetch(&self) -> Result<Vec<TemplateInfo>> {
        let url = self.url();
        debug!("Fetching template catalogue from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::request(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::request(&url, format!("HTTP {}", status)));
        }

        response
            .json::<Vec<TemplateInfo>>()
            .await
            .map_err(|e| Error::request(&url, e))
    }

    /// Catalogue entry for a key
    pub fn find<'a>(templates: &'a [TemplateInfo], key: &str) -> Result<&'a TemplateInfo> {
        templates
            .iter()
            .find(|t| t.key == key)
            .ok_or_else(|| Error::template_not_found(key))
    }
}
