//! Desired-state data model.
//!
//! # Responsibilities
//! - Define the load balancer configuration types carried by the metadata feed
//! - Provide order-sensitive structural equality for change detection
//! - Enforce the target pool naming contract
//!
//! # Design Decisions
//! - Equality is derived over the full structure; frontend and pool order is
//!   significant, so reordering counts as a change
//! - `Snapshot` is a `BTreeMap` so iteration order is deterministic across
//!   passes (write-back order, last-write-wins collisions)
//! - Pool names follow `service_stack_environment`; anything else is rejected
//!   at the call site, never silently repaired

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full desired state at one point in time, keyed by load balancer name.
pub type Snapshot = BTreeMap<String, LBConfig>;

/// Delimiter between the segments of a target pool name.
pub const POOL_NAME_DELIMITER: char = '_';

/// Desired state for one logical load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LBConfig {
    /// Load balancer name, unique within a snapshot.
    pub name: String,

    /// Listener definitions, in metadata order.
    #[serde(default)]
    pub frontends: Vec<Frontend>,

    /// Health rule applied to the load balancer's targets.
    #[serde(default)]
    pub health_check: Option<HealthCheck>,
}

/// One listener definition within a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontend {
    /// Listening port.
    pub port: u16,

    /// Listener protocol.
    #[serde(default)]
    pub protocol: Protocol,

    /// Backend groups this frontend forwards to, in metadata order.
    #[serde(default)]
    pub target_pools: Vec<TargetPool>,
}

/// A named backend group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPool {
    /// Composite name of the form `service_stack_environment`.
    pub name: String,

    /// Backend targets, in metadata order.
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// A single backend target within a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target host address.
    pub address: String,

    /// Target port.
    pub port: u16,
}

/// Listener protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Tcp,
}

/// Health rule for a load balancer's targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheck {
    /// Port probed on each target.
    pub port: u16,

    /// HTTP path probed (ignored for TCP checks).
    pub path: String,

    /// Seconds between probes.
    pub interval_secs: u64,

    /// Consecutive successes before a target is considered healthy.
    pub healthy_threshold: u32,

    /// Consecutive failures before a target is considered unhealthy.
    pub unhealthy_threshold: u32,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            port: 80,
            path: "/".to_string(),
            interval_secs: 5,
            healthy_threshold: 2,
            unhealthy_threshold: 3,
        }
    }
}

/// Split a target pool name into its (service, stack, environment) segments.
///
/// Returns `None` unless the name has exactly three non-empty segments.
pub fn split_pool_name(name: &str) -> Option<(&str, &str, &str)> {
    let mut parts = name.split(POOL_NAME_DELIMITER);
    let service = parts.next()?;
    let stack = parts.next()?;
    let environment = parts.next()?;

    if parts.next().is_some() {
        return None;
    }
    if service.is_empty() || stack.is_empty() || environment.is_empty() {
        return None;
    }

    Some((service, stack, environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(name: &str) -> TargetPool {
        TargetPool {
            name: name.to_string(),
            targets: vec![Target {
                address: "10.0.0.1".to_string(),
                port: 8080,
            }],
        }
    }

    fn config(pools: Vec<TargetPool>) -> LBConfig {
        LBConfig {
            name: "web-lb".to_string(),
            frontends: vec![Frontend {
                port: 80,
                protocol: Protocol::Http,
                target_pools: pools,
            }],
            health_check: None,
        }
    }

    #[test]
    fn test_split_pool_name_valid() {
        assert_eq!(
            split_pool_name("web_front_prod"),
            Some(("web", "front", "prod"))
        );
    }

    #[test]
    fn test_split_pool_name_wrong_segment_count() {
        assert_eq!(split_pool_name("web_front"), None);
        assert_eq!(split_pool_name("web_front_prod_extra"), None);
        assert_eq!(split_pool_name("web"), None);
        assert_eq!(split_pool_name(""), None);
    }

    #[test]
    fn test_split_pool_name_empty_segment() {
        assert_eq!(split_pool_name("web__prod"), None);
        assert_eq!(split_pool_name("_front_prod"), None);
        assert_eq!(split_pool_name("web_front_"), None);
    }

    #[test]
    fn test_pool_order_is_significant() {
        let a = config(vec![pool("a_b_c"), pool("d_e_f")]);
        let b = config(vec![pool("d_e_f"), pool("a_b_c")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_frontend_order_is_significant() {
        let fe = |port| Frontend {
            port,
            protocol: Protocol::Http,
            target_pools: vec![pool("a_b_c")],
        };
        let mut a = config(vec![]);
        a.frontends = vec![fe(80), fe(443)];
        let mut b = a.clone();
        b.frontends = vec![fe(443), fe(80)];
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_equality_covers_key_set() {
        let mut a = Snapshot::new();
        a.insert("lb1".to_string(), config(vec![pool("a_b_c")]));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.insert("lb2".to_string(), config(vec![pool("d_e_f")]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_deserialize_feed_record() {
        let raw = r#"{
            "name": "web-lb",
            "frontends": [
                {
                    "port": 443,
                    "protocol": "tcp",
                    "target_pools": [
                        {
                            "name": "web_front_prod",
                            "targets": [{"address": "10.0.0.5", "port": 8443}]
                        }
                    ]
                }
            ],
            "health_check": {"port": 8443, "path": "/ping"}
        }"#;

        let config: LBConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.name, "web-lb");
        assert_eq!(config.frontends[0].protocol, Protocol::Tcp);
        assert_eq!(config.frontends[0].target_pools[0].name, "web_front_prod");

        let hc = config.health_check.unwrap();
        assert_eq!(hc.port, 8443);
        assert_eq!(hc.path, "/ping");
        // unspecified fields fall back to defaults
        assert_eq!(hc.interval_secs, 5);
    }
}
