//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe
//! service. All types derive Serde traits for deserialization from config
//! files. Every value has a sensible default so the service can boot with an
//! empty config.

use serde::{Deserialize, Serialize};

/// Root configuration for the probe service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Authentication settings for expensive routes.
    pub auth: AuthConfig,

    /// Rate limiting settings for classified routes.
    pub rate_limit: RateLimitConfig,

    /// Synthetic payload bounds.
    pub payload: PayloadConfig,

    /// Build identification reported by /version and /info.
    pub build: BuildInfo,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Shared-secret authentication for expensive routes.
///
/// The secret is compared verbatim against the `x-api-probe-token` request
/// header. An empty secret rejects every expensive request.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret; usually injected via the `API_PROBE_TOKEN` env var.
    pub probe_token: String,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per window per client IP per path.
    pub limit: u64,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Proceed without counting when the store is unreachable.
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 30,
            window_secs: 60,
            fail_open: true,
        }
    }
}

/// Bounds for the synthetic payload handlers (/speed and /upload).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Hard cap on generated and accepted payloads, in bytes.
    pub max_bytes: u64,

    /// Default /speed size when the client does not pass one.
    pub default_speed_bytes: u64,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            // 100 MiB
            max_bytes: 104_857_600,
            // 1 MiB
            default_speed_bytes: 1_048_576,
        }
    }
}

/// Build identification strings, reported but never computed at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: "v1.0.0".to_string(),
            commit: "abcdef0".to_string(),
            date: "unknown".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address for the metrics exporter listener.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
