//! Shared-secret authentication gate for expensive routes.
//!
//! A static bearer check: the `x-api-probe-token` header is compared
//! verbatim against the configured secret. No hashing, no replay
//! protection, no expiry.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ProbeError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::protection::classify::RouteClass;

/// Request header carrying the probe token.
pub const PROBE_TOKEN_HEADER: &str = "x-api-probe-token";

/// Middleware enforcing the token check on expensive paths.
///
/// An unset/empty secret rejects every expensive request rather than
/// letting an empty header match it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if state.routes.classify(path) == RouteClass::Expensive {
        let token = request
            .headers()
            .get(PROBE_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let secret = state.config.auth.probe_token.as_str();

        if secret.is_empty() || token != secret {
            tracing::warn!(path = %path, "Rejected probe token");
            metrics::record_rejection("unauthorized");
            return ProbeError::Unauthorized.into_response();
        }
    }

    next.run(request).await
}
