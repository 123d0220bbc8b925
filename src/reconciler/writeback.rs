//! Endpoint write-back orchestration.
//!
//! Translates a convergence outcome into individual registry calls: every
//! target pool behind every frontend of every converged load balancer gets
//! its workload pointed at the assigned public endpoint.
//!
//! # Design Decisions
//! - Entries are independent: a malformed pool name or a failed registry
//!   call is logged and skipped, never aborting the pass
//! - No deduplication: a workload referenced by several pools gets one call
//!   per occurrence, and the last write wins at the registry
//! - Iteration follows snapshot order, so collisions resolve the same way
//!   every pass

use std::collections::BTreeMap;

use crate::model::{split_pool_name, LBConfig};
use crate::registry::EndpointRegistry;

/// Counters for one write-back sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteBackStats {
    /// Registry calls attempted (valid pool names).
    pub attempted: usize,

    /// Failed entries: malformed pool names plus failed registry calls.
    pub failed: usize,
}

/// Write every (endpoint, config) pair in `endpoints` back to the registry.
pub async fn write_back(
    registry: &dyn EndpointRegistry,
    endpoints: &BTreeMap<String, LBConfig>,
) -> WriteBackStats {
    let mut stats = WriteBackStats::default();

    for (endpoint, config) in endpoints {
        for frontend in &config.frontends {
            for pool in &frontend.target_pools {
                let Some((service, stack, _environment)) = split_pool_name(&pool.name) else {
                    tracing::error!(
                        pool = %pool.name,
                        "Malformed target pool name, expected service_stack_environment"
                    );
                    stats.failed += 1;
                    continue;
                };

                stats.attempted += 1;
                if let Err(e) = registry.associate_endpoint(service, stack, endpoint).await {
                    tracing::error!(
                        service = %service,
                        stack = %stack,
                        endpoint = %endpoint,
                        error = %e,
                        "Failed to update workload endpoint"
                    );
                    stats.failed += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frontend, Protocol, TargetPool};
    use crate::registry::RegistryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Registry stub recording calls and failing on request.
    #[derive(Default)]
    struct RecordingRegistry {
        calls: Mutex<Vec<(String, String, String)>>,
        fail_for_service: Option<String>,
    }

    #[async_trait]
    impl EndpointRegistry for RecordingRegistry {
        async fn associate_endpoint(
            &self,
            service: &str,
            stack: &str,
            endpoint: &str,
        ) -> Result<(), RegistryError> {
            if self.fail_for_service.as_deref() == Some(service) {
                return Err(RegistryError::WorkloadNotFound {
                    service: service.to_string(),
                    stack: stack.to_string(),
                });
            }
            self.calls.lock().unwrap().push((
                service.to_string(),
                stack.to_string(),
                endpoint.to_string(),
            ));
            Ok(())
        }
    }

    fn outcome_with_pools(pool_names: &[&str]) -> BTreeMap<String, LBConfig> {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(
            "lb1.example.com".to_string(),
            LBConfig {
                name: "lb1".to_string(),
                frontends: vec![Frontend {
                    port: 80,
                    protocol: Protocol::Http,
                    target_pools: pool_names
                        .iter()
                        .map(|n| TargetPool {
                            name: n.to_string(),
                            targets: vec![],
                        })
                        .collect(),
                }],
                health_check: None,
            },
        );
        endpoints
    }

    #[tokio::test]
    async fn test_valid_pools_are_written_back() {
        let registry = RecordingRegistry::default();
        let endpoints = outcome_with_pools(&["web_front_prod", "api_front_prod"]);

        let stats = write_back(&registry, &endpoints).await;

        assert_eq!(stats, WriteBackStats { attempted: 2, failed: 0 });
        let calls = registry.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                ("web".to_string(), "front".to_string(), "lb1.example.com".to_string()),
                ("api".to_string(), "front".to_string(), "lb1.example.com".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_pool_name_skips_only_itself() {
        let registry = RecordingRegistry::default();
        let endpoints = outcome_with_pools(&["web_front_prod", "badname", "api_front_prod"]);

        let stats = write_back(&registry, &endpoints).await;

        assert_eq!(stats, WriteBackStats { attempted: 2, failed: 1 });
        assert_eq!(registry.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_registry_failure_does_not_stop_other_entries() {
        let registry = RecordingRegistry {
            fail_for_service: Some("web".to_string()),
            ..Default::default()
        };
        let endpoints = outcome_with_pools(&["web_front_prod", "api_front_prod"]);

        let stats = write_back(&registry, &endpoints).await;

        assert_eq!(stats, WriteBackStats { attempted: 2, failed: 1 });
        let calls = registry.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "api");
    }

    #[tokio::test]
    async fn test_duplicate_workloads_are_not_deduplicated() {
        let registry = RecordingRegistry::default();
        let endpoints = outcome_with_pools(&["web_front_prod", "web_front_staging"]);

        let stats = write_back(&registry, &endpoints).await;

        // Same (service, stack) twice: one call per occurrence.
        assert_eq!(stats, WriteBackStats { attempted: 2, failed: 0 });
        assert_eq!(registry.calls.lock().unwrap().len(), 2);
    }
}
