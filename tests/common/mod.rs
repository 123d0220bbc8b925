//! Shared collaborator stubs for integration testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use lb_controller::metadata::{DesiredStateSource, MetadataError};
use lb_controller::model::{Frontend, LBConfig, Protocol, Snapshot, Target, TargetPool};
use lb_controller::provider::{ApplyOutcome, Provider, ProviderError};
use lb_controller::registry::{EndpointRegistry, RegistryError};

/// Scripted metadata source shared between a test and the reconciler.
#[derive(Default)]
pub struct FakeSource {
    pub version: Mutex<String>,
    pub snapshot: Mutex<Snapshot>,
    pub fail_version: AtomicBool,
    pub fail_snapshot: AtomicBool,
    pub version_calls: AtomicU32,
    pub snapshot_calls: AtomicU32,
}

impl FakeSource {
    pub fn set_version(&self, version: &str) {
        *self.version.lock().unwrap() = version.to_string();
    }

    pub fn set_snapshot(&self, snapshot: Snapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }
}

pub struct SourceHandle(pub Arc<FakeSource>);

#[async_trait]
impl DesiredStateSource for SourceHandle {
    async fn version(&self) -> Result<String, MetadataError> {
        self.0.version_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_version.load(Ordering::SeqCst) {
            return Err(MetadataError::Status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        Ok(self.0.version.lock().unwrap().clone())
    }

    async fn snapshot(&self) -> Result<Snapshot, MetadataError> {
        self.0.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_snapshot.load(Ordering::SeqCst) {
            return Err(MetadataError::Status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        Ok(self.0.snapshot.lock().unwrap().clone())
    }
}

/// Provider stub assigning `<name>.lb.test` to every desired config.
#[derive(Default, Debug)]
pub struct FakeProvider {
    pub calls: AtomicU32,
    pub fail: AtomicBool,
}

#[derive(Debug)]
pub struct ProviderHandle(pub Arc<FakeProvider>);

#[async_trait]
impl Provider for ProviderHandle {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn apply(&self, desired: &Snapshot) -> ApplyOutcome {
        self.0.calls.fetch_add(1, Ordering::SeqCst);

        let mut outcome = ApplyOutcome::default();
        for (name, config) in desired {
            outcome
                .endpoints
                .insert(format!("{}.lb.test", name), config.clone());
        }
        if self.0.fail.load(Ordering::SeqCst) {
            outcome.error = Some(ProviderError::Partial {
                failed: 1,
                total: desired.len(),
            });
        }
        outcome
    }
}

/// Registry stub recording every association.
#[derive(Default)]
pub struct FakeRegistry {
    pub calls: Mutex<Vec<(String, String, String)>>,
}

pub struct RegistryHandle(pub Arc<FakeRegistry>);

#[async_trait]
impl EndpointRegistry for RegistryHandle {
    async fn associate_endpoint(
        &self,
        service: &str,
        stack: &str,
        endpoint: &str,
    ) -> Result<(), RegistryError> {
        self.0.calls.lock().unwrap().push((
            service.to_string(),
            stack.to_string(),
            endpoint.to_string(),
        ));
        Ok(())
    }
}

/// A one-LB snapshot with the given target pool names.
pub fn snapshot_with_pools(lb_name: &str, pool_names: &[&str]) -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert(
        lb_name.to_string(),
        LBConfig {
            name: lb_name.to_string(),
            frontends: vec![Frontend {
                port: 80,
                protocol: Protocol::Http,
                target_pools: pool_names
                    .iter()
                    .map(|n| TargetPool {
                        name: n.to_string(),
                        targets: vec![Target {
                            address: "10.0.0.1".to_string(),
                            port: 8080,
                        }],
                    })
                    .collect(),
            }],
            health_check: None,
        },
    );
    snapshot
}
