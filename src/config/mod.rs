//! Configuration subsystem.
//!
//! # Design Decisions
//! - Config is constructed once at startup and passed by reference (Arc)
//!   into the dispatcher; nothing reads the environment after boot
//! - Every section has a Default so an empty file is a valid config
//! - Validation runs at load time, never in the request path

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, load_config, validate_config, ConfigError};
pub use schema::{
    AuthConfig, BuildInfo, ListenerConfig, ObservabilityConfig, PayloadConfig, ProbeConfig,
    RateLimitConfig, TimeoutConfig,
};
