//! Request handlers.
//!
//! # Data Flow
//! ```text
//! Dispatcher (exact path + method match)
//!     → diagnostics.rs (ping / info / headers / version / healthz / echo)
//!     → payload.rs (speed generator, upload sink)
//!     → metadata.rs (trusted edge headers → ClientMetadata)
//! ```

pub mod diagnostics;
pub mod metadata;
pub mod payload;

use chrono::{SecondsFormat, Utc};

/// ISO-8601 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
