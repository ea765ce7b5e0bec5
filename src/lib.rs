//! Edge-deployed HTTP diagnostic/probe service.
//!
//! Answers network-quality and connectivity questions for clients testing
//! an edge network: round-trip ping metadata, synthetic payload transfer
//! for throughput testing, header/echo introspection, and version
//! reporting.
//!
//! # Architecture Overview
//!
//! ```text
//! request → dispatcher (exact path + method)
//!         → protection (auth gate for expensive routes,
//!                       per-client window counter for classified routes)
//!         → handler (diagnostics reflection / synthetic payload)
//!         → secure response builder (fixed security-header set)
//! ```
//!
//! Each request is handled statelessly; the only cross-request coordination
//! is the rate-limit counter store behind the [`store::RateLimitStore`]
//! port.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod observability;
pub mod protection;
pub mod store;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use http::HttpServer;
