//! Secure response construction.
//!
//! # Responsibilities
//! - Wrap text, JSON, and raw-byte bodies in a response
//! - Pick the content type from the body kind unless the caller set one
//! - Overlay the fixed security-header set on every response
//!
//! # Design Decisions
//! - Security headers are applied last, after caller headers, and win on
//!   conflict; no code path may produce a response without them
//! - Byte bodies and structured bodies never share content-type handling

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Overlay the fixed security-header set, replacing any caller-supplied
/// values for the same names.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("x-xss-protection"),
        HeaderValue::from_static("0"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
}

enum BodyKind {
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

/// Builder for responses that always carry the security-header set.
pub struct SecureResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyKind,
}

impl SecureResponse {
    /// Plain-text body, `text/plain` unless overridden.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body(BodyKind::Text(body.into()))
    }

    /// JSON body, `application/json`.
    pub fn json(body: serde_json::Value) -> Self {
        Self::with_body(BodyKind::Json(body))
    }

    /// Raw byte body, `application/octet-stream` unless overridden.
    pub fn bytes(body: Vec<u8>) -> Self {
        Self::with_body(BodyKind::Bytes(body))
    }

    fn with_body(body: BodyKind) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a caller header. Values that are not valid header text are
    /// dropped rather than panicking in the request path.
    pub fn header(mut self, name: HeaderName, value: impl AsRef<str>) -> Self {
        if let Ok(value) = HeaderValue::from_str(value.as_ref()) {
            self.headers.insert(name, value);
        }
        self
    }
}

impl IntoResponse for SecureResponse {
    fn into_response(self) -> Response {
        let Self {
            status,
            mut headers,
            body,
        } = self;

        let (default_content_type, body) = match body {
            BodyKind::Text(text) => ("text/plain", Body::from(text)),
            BodyKind::Json(value) => ("application/json", Body::from(value.to_string())),
            BodyKind::Bytes(bytes) => ("application/octet-stream", Body::from(bytes)),
        };

        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(default_content_type),
            );
        }
        apply_security_headers(&mut headers);

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_security_headers_always_present() {
        let response = SecureResponse::text("ok").into_response();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
            "max-age=31536000; includeSubDomains; preload"
        );
        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
        assert_eq!(headers.get(header::EXPIRES).unwrap(), "0");
    }

    #[test]
    fn test_caller_cannot_weaken_security_headers() {
        let response = SecureResponse::text("ok")
            .header(header::X_FRAME_OPTIONS, "ALLOWALL")
            .header(header::CACHE_CONTROL, "public, max-age=3600")
            .into_response();
        let headers = response.headers();
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
    }

    #[test]
    fn test_content_type_by_body_kind() {
        let text = SecureResponse::text("ok").into_response();
        assert_eq!(text.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");

        let json = SecureResponse::json(json!({"a": 1})).into_response();
        assert_eq!(
            json.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = SecureResponse::bytes(vec![0u8; 4]).into_response();
        assert_eq!(
            bytes.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_caller_can_override_content_type() {
        let response = SecureResponse::bytes(vec![1, 2, 3])
            .header(header::CONTENT_TYPE, "application/x-test")
            .into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/x-test"
        );
    }

    #[test]
    fn test_status_passthrough() {
        let response = SecureResponse::json(json!({"error": "nope"}))
            .status(StatusCode::IM_A_TEAPOT)
            .into_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
