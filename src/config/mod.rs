//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI flag overrides (main.rs)
//!     → LB_POLL_INTERVAL env override
//!     → Settings (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once the process is up; no hot reload
//! - All fields have defaults so the controller runs with no file at all
//! - CLI flags win over the file; the env var wins over both for the poll
//!   interval (operator knob on deployed instances)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_poll_interval_env, load_settings, ConfigError, POLL_INTERVAL_ENV};
pub use schema::Settings;
pub use validation::{validate_settings, ValidationError};
