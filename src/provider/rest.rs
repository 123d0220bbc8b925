//! REST-backed provider.
//!
//! Converges load balancers through an external LB manager's HTTP API:
//! each desired configuration is upserted with an idempotent PUT, and
//! managed load balancers that are no longer desired are deleted.
//!
//! # Responsibilities
//! - Upsert every desired load balancer and collect assigned endpoints
//! - Sweep orphaned load balancers the manager still runs
//! - Keep going past per-item failures; report them as a partial outcome

use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

use crate::model::{LBConfig, Snapshot};
use crate::provider::{ApplyOutcome, Provider, ProviderError};

/// Environment variable holding the LB manager base URL.
pub const PROVIDER_URL_ENV: &str = "PROVIDER_URL";

/// Name this provider is registered under.
pub const PROVIDER_NAME: &str = "rest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct LbSummary {
    name: String,
}

/// Provider speaking to an external LB manager over HTTP.
#[derive(Debug)]
pub struct RestProvider {
    base: Url,
    http: reqwest::Client,
}

impl RestProvider {
    /// Create a provider for the given manager base URL.
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let mut base: Url = base_url.parse().map_err(|e: url::ParseError| {
            ProviderError::BaseUrl {
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

    /// Create a provider from `PROVIDER_URL`. A missing variable is a
    /// startup error.
    pub fn from_env() -> Result<Self, ProviderError> {
        let base_url =
            env::var(PROVIDER_URL_ENV).map_err(|_| ProviderError::MissingEnv(PROVIDER_URL_ENV))?;
        Self::new(&base_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base.join(path).map_err(|e| ProviderError::BaseUrl {
            url: format!("{}/{}", self.base, path),
            reason: e.to_string(),
        })
    }

    /// Upsert one load balancer and return its assigned public endpoint.
    ///
    /// PUT keyed by name, so re-applying an unchanged configuration is a
    /// no-op on the manager side.
    async fn upsert(&self, name: &str, config: &LBConfig) -> Result<String, ProviderError> {
        let url = self.endpoint(&format!("loadbalancers/{}", name))?;
        let response = self.http.put(url).json(config).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                name: name.to_string(),
                status: response.status(),
            });
        }

        let body: UpsertResponse = response.json().await?;
        Ok(body.endpoint)
    }

    async fn list_managed(&self) -> Result<Vec<String>, ProviderError> {
        let url = self.endpoint("loadbalancers")?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                name: "<list>".to_string(),
                status: response.status(),
            });
        }

        let summaries: Vec<LbSummary> = response.json().await?;
        Ok(summaries.into_iter().map(|s| s.name).collect())
    }

    async fn delete(&self, name: &str) -> Result<(), ProviderError> {
        let url = self.endpoint(&format!("loadbalancers/{}", name))?;
        let response = self.http.delete(url).send().await?;

        // Already gone counts as converged.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::Status {
                name: name.to_string(),
                status: response.status(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Provider for RestProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn apply(&self, desired: &Snapshot) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        let mut failed = 0;

        for (name, config) in desired {
            match self.upsert(name, config).await {
                Ok(endpoint) => {
                    tracing::debug!(lb = %name, endpoint = %endpoint, "Converged load balancer");
                    outcome.endpoints.insert(endpoint, config.clone());
                }
                Err(e) => {
                    tracing::warn!(lb = %name, error = %e, "Failed to converge load balancer");
                    failed += 1;
                }
            }
        }

        match self.list_managed().await {
            Ok(managed) => {
                for name in orphans(&managed, desired) {
                    if let Err(e) = self.delete(&name).await {
                        tracing::warn!(lb = %name, error = %e, "Failed to remove orphaned load balancer");
                        failed += 1;
                    } else {
                        tracing::info!(lb = %name, "Removed orphaned load balancer");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list managed load balancers, skipping orphan sweep");
                outcome.error = Some(e);
            }
        }

        if failed > 0 {
            outcome.error = Some(ProviderError::Partial {
                failed,
                total: desired.len(),
            });
        }

        outcome
    }
}

/// Managed load balancers with no counterpart in the desired snapshot.
fn orphans(managed: &[String], desired: &Snapshot) -> Vec<String> {
    managed
        .iter()
        .filter(|name| !desired.contains_key(*name))
        .cloned()
        .collect()
}
