//! Sliding-minute-window rate limiter for classified routes.
//!
//! # Design Decisions
//! - Counter key is {client IP, path, window bucket}; the bucket changes
//!   every window, so counters reset without explicit cleanup
//! - The store's atomic increment-with-expiry is the check: the
//!   post-increment count decides pass/reject, leaving no race between
//!   concurrent requests in the same bucket
//! - Store failure means "rate limit unknown": fail-open skips the check

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ProbeError;
use crate::handlers::metadata::client_ip;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::protection::classify::RouteClass;

/// Current window bucket: floor(now_ms / window_ms).
pub fn window_bucket(now_ms: u64, window_secs: u64) -> u64 {
    now_ms / (window_secs * 1000)
}

/// Counter key for {client IP, path, bucket}.
pub fn rate_limit_key(ip: &str, path: &str, bucket: u64) -> String {
    format!("rate:{ip}:{path}:{bucket}")
}

/// Middleware enforcing the per-client window counter.
///
/// Applies to both free-limited and expensive paths (the auth gate has
/// already run for the latter); unclassified paths pass untouched.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limits = &state.config.rate_limit;
    let path = request.uri().path().to_string();

    if limits.enabled && state.routes.classify(&path) != RouteClass::Unclassified {
        let ip = client_ip(request.headers());
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let bucket = window_bucket(now_ms, limits.window_secs);
        let key = rate_limit_key(&ip, &path, bucket);

        match state
            .store
            .incr(&key, Duration::from_secs(limits.window_secs))
            .await
        {
            Ok(count) if count > limits.limit => {
                tracing::warn!(client = %ip, path = %path, count, "Rate limit exceeded");
                metrics::record_rejection("rate_limited");
                return ProbeError::RateLimited {
                    retry_after_secs: limits.window_secs,
                }
                .into_response();
            }
            Ok(_) => {}
            Err(error) => {
                if limits.fail_open {
                    tracing::warn!(error = %error, "Rate-limit store unavailable, failing open");
                } else {
                    tracing::error!(error = %error, "Rate-limit store unavailable, failing closed");
                    metrics::record_rejection("store_unavailable");
                    return ProbeError::RateLimited {
                        retry_after_secs: limits.window_secs,
                    }
                    .into_response();
                }
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_floors_to_window() {
        assert_eq!(window_bucket(0, 60), 0);
        assert_eq!(window_bucket(59_999, 60), 0);
        assert_eq!(window_bucket(60_000, 60), 1);
        assert_eq!(window_bucket(185_000, 60), 3);
    }

    #[test]
    fn test_key_changes_with_bucket() {
        let first = rate_limit_key("1.2.3.4", "/ping", 100);
        let next = rate_limit_key("1.2.3.4", "/ping", 101);
        assert_ne!(first, next);
    }

    #[test]
    fn test_key_separates_clients_and_paths() {
        let a = rate_limit_key("1.2.3.4", "/ping", 7);
        let b = rate_limit_key("5.6.7.8", "/ping", 7);
        let c = rate_limit_key("1.2.3.4", "/info", 7);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
