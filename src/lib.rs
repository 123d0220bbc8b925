//! External Load Balancer Reconciliation Controller
//!
//! Watches a service-discovery metadata feed for load balancer
//! configurations, converges an external provider toward them, and writes
//! the resulting public endpoints back to the workload registry.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │                RECONCILE CONTROLLER                 │
//!                  │                                                     │
//!   metadata feed  │  ┌──────────┐   ┌────────────┐   ┌──────────────┐  │
//!   ───────────────┼─▶│ metadata │──▶│ reconciler │──▶│   provider   │──┼──▶ external LB
//!   version +      │  │  client  │   │ loop+cache │   │  (pluggable) │  │    infrastructure
//!   snapshot       │  └──────────┘   └─────┬──────┘   └──────┬───────┘  │
//!                  │                       │                 │           │
//!                  │                       │   assigned endpoints        │
//!                  │                       ▼                 │           │
//!                  │                 ┌──────────┐◀───────────┘           │
//!   workload       │                 │ registry │                        │
//!   registry     ◀─┼─────────────────│  client  │                        │
//!                  │                 └──────────┘                        │
//!                  │                                                     │
//!                  │  ┌──────────────────────────────────────────────┐  │
//!                  │  │            Cross-Cutting Concerns             │  │
//!                  │  │  ┌────────┐ ┌────────┐ ┌───────────────────┐ │  │
//!                  │  │  │ config │ │ health │ │  observability    │ │  │
//!                  │  │  └────────┘ └────────┘ └───────────────────┘ │  │
//!                  │  │  ┌─────────────────────────────────────────┐ │  │
//!                  │  │  │         lifecycle (shutdown)            │ │  │
//!                  │  │  └─────────────────────────────────────────┘ │  │
//!                  │  └──────────────────────────────────────────────┘  │
//!                  └────────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod metadata;
pub mod model;
pub mod provider;
pub mod reconciler;
pub mod registry;

// Cross-cutting concerns
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::Settings;
pub use lifecycle::Shutdown;
pub use reconciler::Reconciler;
