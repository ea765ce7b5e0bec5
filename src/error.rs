//! Client-facing error taxonomy.
//!
//! Every variant renders as a structured JSON body through the secure
//! response builder, so error responses carry the same security headers as
//! success responses. Internal detail is logged, never returned.

use axum::http::header;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::http::response::SecureResponse;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Bad or missing probe token on an expensive path.
    #[error("Unauthorized")]
    Unauthorized,

    /// Per-client counter over the threshold.
    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    /// Speed-test size parameter is not a positive integer.
    #[error("Invalid size. Must be 1-{max} bytes.")]
    InvalidSize { max: u64 },

    /// Requested or received payload exceeds the hard cap.
    #[error("Size too large (max {max} bytes)")]
    PayloadTooLarge { max: u64 },

    /// Uncaught internal fault; the detail is logged but not leaked.
    #[error("Internal Server Error")]
    Internal(String),
}

impl ProbeError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidSize { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal fault");
        }

        let mut response =
            SecureResponse::json(json!({ "error": self.to_string() })).status(self.status());

        match &self {
            Self::Unauthorized => {
                response = response.header(header::WWW_AUTHENTICATE, "Bearer");
            }
            Self::RateLimited { retry_after_secs } => {
                response = response.header(header::RETRY_AFTER, retry_after_secs.to_string());
            }
            _ => {}
        }

        response.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ProbeError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        // Errors never bypass the builder.
        assert!(response
            .headers()
            .contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let response = ProbeError::RateLimited {
            retry_after_secs: 60,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let error = ProbeError::Internal("rng device went away".to_string());
        assert_eq!(error.to_string(), "Internal Server Error");
    }
}
