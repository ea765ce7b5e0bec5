//! Synthetic payload handlers: the speed-test generator and the upload sink.
//!
//! # Design Decisions
//! - Size validation happens before any buffer is allocated
//! - The random pattern fills in chunks of at most 65536 bytes per call to
//!   the secure-randomness primitive; a fill failure is a loud 500, never a
//!   silently truncated buffer
//! - The upload sink drains the full inbound body even past the cap, so the
//!   transport is never left with a half-read stream

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::Request;
use futures_util::StreamExt;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::json;

use crate::error::ProbeError;
use crate::handlers::metadata::{self, headers_as_json};
use crate::handlers::timestamp;
use crate::http::response::SecureResponse;
use crate::http::server::AppState;

/// Upper bound per secure-randomness call, a hard platform constraint.
const RANDOM_FILL_CHUNK: usize = 65536;

/// Fill pattern for the generated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPattern {
    Zero,
    Asterisk,
    Rand,
}

impl FillPattern {
    /// Unrecognized patterns fall back to the fixed-byte fill.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "zero" => Self::Zero,
            "rand" => Self::Rand,
            _ => Self::Asterisk,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Asterisk => "asterisk",
            Self::Rand => "rand",
        }
    }
}

/// Parse and bound the requested size. Rejects before any allocation:
/// non-numeric, zero, or negative is a 400; over the cap is a 413.
pub fn parse_size(
    raw: Option<&str>,
    default: u64,
    max: u64,
) -> Result<u64, ProbeError> {
    let raw = match raw {
        None => return Ok(default),
        Some(raw) => raw,
    };
    let size: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ProbeError::InvalidSize { max })?;
    if size <= 0 {
        return Err(ProbeError::InvalidSize { max });
    }
    let size = size as u64;
    if size > max {
        return Err(ProbeError::PayloadTooLarge { max });
    }
    Ok(size)
}

fn fill_random(buffer: &mut [u8]) -> Result<(), ProbeError> {
    for chunk in buffer.chunks_mut(RANDOM_FILL_CHUNK) {
        OsRng
            .try_fill_bytes(chunk)
            .map_err(|error| ProbeError::Internal(format!("secure random fill failed: {error}")))?;
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// GET /speed — generate a byte buffer of the requested size and pattern,
/// or a JSON size description when the `meta` flag is present.
pub async fn speed(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<SecureResponse, ProbeError> {
    let limits = &state.config.payload;
    let size = parse_size(
        params.get("size").map(String::as_str),
        limits.default_speed_bytes,
        limits.max_bytes,
    )?;
    let pattern = FillPattern::parse(params.get("pattern").map(String::as_str).unwrap_or(""));

    if params.contains_key("meta") {
        return Ok(SecureResponse::json(json!({
            "bytes": size,
            "kibibytes": round2(size as f64 / 1024.0),
            "mebibytes": round2(size as f64 / 1_048_576.0),
            "pattern": pattern.name(),
        })));
    }

    let mut buffer = vec![0u8; size as usize];
    match pattern {
        FillPattern::Zero => {}
        FillPattern::Asterisk => buffer.fill(b'*'),
        FillPattern::Rand => fill_random(&mut buffer)?,
    }

    Ok(SecureResponse::bytes(buffer).header(CONTENT_LENGTH, size.to_string()))
}

/// POST /upload — consume and measure the inbound byte stream.
pub async fn upload(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<SecureResponse, ProbeError> {
    let headers = request.headers().clone();
    let max = state.config.payload.max_bytes;

    let mut stream = request.into_body().into_data_stream();
    let mut body = Vec::new();
    let mut received: u64 = 0;
    while let Some(frame) = stream.next().await {
        let chunk =
            frame.map_err(|error| ProbeError::Internal(format!("body read failed: {error}")))?;
        received += chunk.len() as u64;
        if received <= max {
            body.extend_from_slice(&chunk);
        }
        // Past the cap: keep draining so the connection stays consistent.
    }

    if received > max {
        return Err(ProbeError::PayloadTooLarge { max });
    }

    let trace = metadata::traceparent(&headers);
    let payload = json!({
        "size": received,
        "timestamp": timestamp(),
        "headers": headers_as_json(&headers),
        "traceparent": trace,
    });
    let mut response = SecureResponse::json(payload);
    if let Some(trace) = trace {
        response = response.header(
            axum::http::header::HeaderName::from_static("traceparent"),
            trace,
        );
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 104_857_600;

    #[test]
    fn test_size_default_when_absent() {
        assert_eq!(parse_size(None, 1_048_576, MAX).unwrap(), 1_048_576);
    }

    #[test]
    fn test_size_rejects_garbage() {
        for raw in ["abc", "", "12.5", "0", "-1"] {
            let err = parse_size(Some(raw), 1, MAX).unwrap_err();
            assert!(matches!(err, ProbeError::InvalidSize { .. }), "{raw}");
        }
    }

    #[test]
    fn test_size_rejects_over_cap() {
        let err = parse_size(Some("104857601"), 1, MAX).unwrap_err();
        assert!(matches!(err, ProbeError::PayloadTooLarge { .. }));
        assert_eq!(parse_size(Some("104857600"), 1, MAX).unwrap(), MAX);
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(FillPattern::parse("zero"), FillPattern::Zero);
        assert_eq!(FillPattern::parse("rand"), FillPattern::Rand);
        assert_eq!(FillPattern::parse("asterisk"), FillPattern::Asterisk);
        assert_eq!(FillPattern::parse("anything"), FillPattern::Asterisk);
    }

    #[test]
    fn test_random_fill_covers_multiple_chunks() {
        let mut buffer = vec![0u8; RANDOM_FILL_CHUNK * 2 + 17];
        fill_random(&mut buffer).unwrap();
        // A zero run across the chunk seam would betray a skipped fill; an
        // all-zero 64 KiB chunk from a real RNG is not a plausible outcome.
        assert!(buffer[..RANDOM_FILL_CHUNK].iter().any(|&b| b != 0));
        assert!(buffer[RANDOM_FILL_CHUNK..].iter().any(|&b| b != 0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1024.0 / 1024.0), 1.0);
        assert_eq!(round2(1500.0 / 1024.0), 1.46);
    }
}
