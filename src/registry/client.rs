//! HTTP client for the workload registry API.
//!
//! # Responsibilities
//! - Resolve a workload record by (service, stack)
//! - Upsert the workload's public endpoint field
//! - Authenticate with the access/secret key pair from the environment

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::registry::{EndpointRegistry, RegistryError};

/// Environment variables the registry client is constructed from.
pub const REGISTRY_URL_ENV: &str = "REGISTRY_URL";
pub const REGISTRY_ACCESS_KEY_ENV: &str = "REGISTRY_ACCESS_KEY";
pub const REGISTRY_SECRET_KEY_ENV: &str = "REGISTRY_SECRET_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WorkloadList {
    #[serde(default)]
    data: Vec<Workload>,
}

#[derive(Debug, Deserialize)]
struct Workload {
    id: String,
}

#[derive(Debug, Serialize)]
struct EndpointUpdate<'a> {
    public_endpoint: &'a str,
}

/// HTTP client for the workload registry.
pub struct RegistryClient {
    base: Url,
    http: reqwest::Client,
    access_key: String,
    secret_key: String,
}

impl RegistryClient {
    /// Create a client with explicit credentials.
    pub fn new(
        base_url: &str,
        access_key: String,
        secret_key: String,
    ) -> Result<Self, RegistryError> {
        let mut base: Url = base_url.parse().map_err(|e: url::ParseError| {
            RegistryError::BaseUrl {
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

        Ok(Self {
            base,
            http,
            access_key,
            secret_key,
        })
    }

    /// Create a client from `REGISTRY_URL` / `REGISTRY_ACCESS_KEY` /
    /// `REGISTRY_SECRET_KEY`. Missing variables are startup errors.
    pub fn from_env() -> Result<Self, RegistryError> {
        let base_url =
            env::var(REGISTRY_URL_ENV).map_err(|_| RegistryError::MissingEnv(REGISTRY_URL_ENV))?;
        let access_key = env::var(REGISTRY_ACCESS_KEY_ENV)
            .map_err(|_| RegistryError::MissingEnv(REGISTRY_ACCESS_KEY_ENV))?;
        let secret_key = env::var(REGISTRY_SECRET_KEY_ENV)
            .map_err(|_| RegistryError::MissingEnv(REGISTRY_SECRET_KEY_ENV))?;

        Self::new(&base_url, access_key, secret_key)
    }

    fn endpoint(&self, path: &str) -> Result<Url, RegistryError> {
        self.base.join(path).map_err(|e| RegistryError::BaseUrl {
            url: format!("{}/{}", self.base, path),
            reason: e.to_string(),
        })
    }

    async fn find_workload(&self, service: &str, stack: &str) -> Result<String, RegistryError> {
        let url = self.endpoint("workloads")?;
        let response = self
            .http
            .get(url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .query(&[("service", service), ("stack", stack)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status()));
        }

        let list: WorkloadList = response.json().await?;
        match list.data.into_iter().next() {
            Some(workload) => Ok(workload.id),
            None => Err(RegistryError::WorkloadNotFound {
                service: service.to_string(),
                stack: stack.to_string(),
            }),
        }
    }
}

#[async_trait]
impl EndpointRegistry for RegistryClient {
    async fn associate_endpoint(
        &self,
        service: &str,
        stack: &str,
        endpoint: &str,
    ) -> Result<(), RegistryError> {
        let id = self.find_workload(service, stack).await?;

        let url = self.endpoint(&format!("workloads/{}", id))?;
        let response = self
            .http
            .put(url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .json(&EndpointUpdate {
                public_endpoint: endpoint,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status()));
        }

        tracing::debug!(
            service = %service,
            stack = %stack,
            endpoint = %endpoint,
            "Associated public endpoint"
        );
        Ok(())
    }
}
