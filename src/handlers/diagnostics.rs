//! Diagnostic reflection handlers.
//!
//! Ping, Info, Headers, Version, Healthz, Echo: pure reflections of request
//! and client metadata with no side effects beyond response construction.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderName};
use serde_json::{json, Value};

use crate::handlers::metadata::{self, ClientMetadata};
use crate::handlers::timestamp;
use crate::http::response::SecureResponse;
use crate::http::server::AppState;

fn metadata_value(headers: &HeaderMap) -> Value {
    serde_json::to_value(ClientMetadata::from_headers(headers)).unwrap_or(Value::Null)
}

/// Echo the inbound trace header on the response when present.
fn with_trace(response: SecureResponse, headers: &HeaderMap) -> SecureResponse {
    match metadata::traceparent(headers) {
        Some(trace) => response.header(HeaderName::from_static("traceparent"), trace),
        None => response,
    }
}

fn trace_field(headers: &HeaderMap) -> Value {
    match metadata::traceparent(headers) {
        Some(trace) => Value::String(trace),
        None => Value::Null,
    }
}

/// GET /ping — timestamp plus the client network metadata as supplied by
/// the edge.
pub async fn ping(headers: HeaderMap) -> SecureResponse {
    let body = json!({
        "timestamp": timestamp(),
        "cf": metadata_value(&headers),
        "traceparent": trace_field(&headers),
    });
    with_trace(SecureResponse::json(body), &headers)
}

/// GET /info — superset of ping: network metadata, client IP, user agent,
/// and the build identification.
pub async fn info(State(state): State<AppState>, headers: HeaderMap) -> SecureResponse {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let body = json!({
        "version": state.config.build.version,
        "commit": state.config.build.commit,
        "build": state.config.build.date,
        "ip": metadata::client_ip(&headers),
        "user_agent": user_agent,
        "cf": metadata_value(&headers),
        "traceparent": trace_field(&headers),
    });
    with_trace(SecureResponse::json(body), &headers)
}

/// GET /headers — verbatim map of every inbound header.
pub async fn headers(header_map: HeaderMap) -> SecureResponse {
    let body = json!({
        "headers": metadata::headers_as_json(&header_map),
        "traceparent": trace_field(&header_map),
    });
    with_trace(SecureResponse::json(body), &header_map)
}

/// GET /version — build identification from configuration, never computed.
pub async fn version(State(state): State<AppState>) -> SecureResponse {
    SecureResponse::json(json!({
        "version": state.config.build.version,
        "commit": state.config.build.commit,
        "build": state.config.build.date,
    }))
}

/// GET /healthz — constant liveness answer.
pub async fn healthz() -> SecureResponse {
    SecureResponse::json(json!({ "status": "ok" }))
}

/// POST /echo — the raw body text, byte-for-byte, plus the inbound headers.
pub async fn echo(headers: HeaderMap, body: Bytes) -> SecureResponse {
    let body_text = String::from_utf8_lossy(&body).into_owned();
    let payload = json!({
        "body": body_text,
        "headers": metadata::headers_as_json(&headers),
        "traceparent": trace_field(&headers),
    });
    with_trace(SecureResponse::json(payload), &headers)
}
