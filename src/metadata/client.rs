//! HTTP client for the service-discovery metadata feed.
//!
//! # Responsibilities
//! - Fetch the feed version token
//! - Fetch service records and assemble the desired-state snapshot
//! - Handle timeouts and non-success statuses gracefully

use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

use crate::metadata::{DesiredStateSource, MetadataError};
use crate::model::{Frontend, HealthCheck, LBConfig, Snapshot};

/// Environment variable holding the metadata feed base URL.
pub const METADATA_URL_ENV: &str = "METADATA_URL";

const DEFAULT_METADATA_URL: &str = "http://metadata.internal/latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Record kind the feed uses for load balancer services.
const LOAD_BALANCER_KIND: &str = "loadBalancer";

/// One service record from the metadata feed.
///
/// Only load balancer records contribute to the snapshot; other kinds are
/// skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceRecord {
    name: String,
    kind: String,
    #[serde(default)]
    frontends: Vec<Frontend>,
    #[serde(default)]
    health_check: Option<HealthCheck>,
}

/// HTTP client for the metadata feed.
pub struct MetadataClient {
    base: Url,
    http: reqwest::Client,
}

impl MetadataClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, MetadataError> {
        let mut base: Url = base_url.parse().map_err(|e: url::ParseError| {
            MetadataError::BaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        // Url::join drops the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { base, http })
    }

    /// Create a client from `METADATA_URL`, falling back to the default
    /// in-cluster address.
    pub fn from_env() -> Result<Self, MetadataError> {
        let base_url =
            env::var(METADATA_URL_ENV).unwrap_or_else(|_| DEFAULT_METADATA_URL.to_string());
        Self::new(&base_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, MetadataError> {
        self.base.join(path).map_err(|e| MetadataError::BaseUrl {
            url: format!("{}/{}", self.base, path),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DesiredStateSource for MetadataClient {
    async fn version(&self) -> Result<String, MetadataError> {
        let url = self.endpoint("version")?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status()));
        }

        Ok(response.text().await?.trim().to_string())
    }

    async fn snapshot(&self) -> Result<Snapshot, MetadataError> {
        let url = self.endpoint("services")?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status()));
        }

        let records: Vec<ServiceRecord> = response.json().await?;
        Ok(snapshot_from_records(records))
    }
}

/// Assemble a snapshot from feed records, keeping only load balancer kinds.
pub(crate) fn snapshot_from_records(records: Vec<ServiceRecord>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for record in records {
        if record.kind != LOAD_BALANCER_KIND {
            continue;
        }
        snapshot.insert(
            record.name.clone(),
            LBConfig {
                name: record.name,
                frontends: record.frontends,
                health_check: record.health_check,
            },
        );
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_skips_non_lb_kinds() {
        let raw = r#"[
            {"name": "web-lb", "kind": "loadBalancer", "frontends": [
                {"port": 80, "target_pools": [{"name": "web_front_prod"}]}
            ]},
            {"name": "db", "kind": "service"},
            {"name": "api-lb", "kind": "loadBalancer"}
        ]"#;

        let records: Vec<ServiceRecord> = serde_json::from_str(raw).unwrap();
        let snapshot = snapshot_from_records(records);

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("web-lb"));
        assert!(snapshot.contains_key("api-lb"));
        assert_eq!(
            snapshot["web-lb"].frontends[0].target_pools[0].name,
            "web_front_prod"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(MetadataClient::new("not a url").is_err());
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let client = MetadataClient::new("http://metadata.internal/latest").unwrap();
        let url = client.endpoint("version").unwrap();
        assert_eq!(url.as_str(), "http://metadata.internal/latest/version");
    }
}
