//! Registry lookup over the npm registry HTTP API.

use crate::registry::normalize::{classify_value, ChannelPayload};
use crate::registry::{encode_package_path, RegistryQuery, DEFAULT_REGISTRY};
use crate::types::{LookupResult, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

/// Fetches the package document from `{registry}/{name}`.
pub struct HttpLookup {
    client: Client,
}

impl HttpLookup {
    /// Create a new HTTP lookup; queries default to the public registry.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("publishable/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Document URL for a package on a registry.
    pub fn package_url(registry: &str, name: &str) -> String {
        format!(
            "{}/{}",
            registry.trim_end_matches('/'),
            encode_package_path(name)
        )
    }
}

#[async_trait]
impl RegistryQuery for HttpLookup {
    async fn query_versions(&self, name: &str, registry: Option<&Url>) -> LookupResult {
        let base = registry.map_or(DEFAULT_REGISTRY, Url::as_str);
        let url = Self::package_url(base, name);
        trace!("Checking registry: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return LookupResult::Failed(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Package not published yet: {}", name);
            return LookupResult::NotFound;
        }
        if !status.is_success() {
            return LookupResult::Failed(
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            );
        }

        let body = match response.json::<serde_json::Value>().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse registry response for {}: {}", name, e);
                return LookupResult::Failed(e.to_string());
            }
        };

        match classify_value(&body) {
            ChannelPayload::VersionList(versions) => LookupResult::from_versions(versions),
            ChannelPayload::NotFoundError => LookupResult::NotFound,
            ChannelPayload::OtherError(message) => LookupResult::Failed(message),
            ChannelPayload::Unparseable | ChannelPayload::Empty => {
                LookupResult::Failed("unrecognized registry response".to_string())
            }
        }
    }
}
