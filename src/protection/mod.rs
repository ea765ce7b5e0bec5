//! Request protection pipeline.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → classify.rs (expensive / free-limited / unclassified)
//!     → auth.rs (probe-token gate, expensive paths only)
//!     → rate_limit.rs (per-client window counter, classified paths)
//!     → Pass to dispatch
//! ```
//!
//! Gate rejections still render through the secure response builder, so no
//! rejection path escapes the security-header set.

pub mod auth;
pub mod classify;
pub mod rate_limit;

pub use classify::{RouteClass, RouteTable};
