//! Client network metadata supplied by the edge platform.
//!
//! The front-line network annotates each request with trusted headers
//! describing the client and the serving point-of-presence. This module is
//! the only place that knows those header names; handlers consume the
//! extracted [`ClientMetadata`].

use axum::http::header::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Trusted client-IP header set by the edge proxy.
pub const CLIENT_IP_HEADER: &str = "cf-connecting-ip";

/// Trace-correlation header, echoed back unmodified.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Network metadata fields for the client and serving colo. Absent fields
/// report the literal `"unknown"`.
#[derive(Debug, Clone, Serialize)]
pub struct ClientMetadata {
    pub ip: String,
    pub asn: String,
    pub colo: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
}

impl ClientMetadata {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip: header_or_unknown(headers, CLIENT_IP_HEADER),
            asn: header_or_unknown(headers, "cf-asn"),
            colo: header_or_unknown(headers, "cf-colo"),
            country: header_or_unknown(headers, "cf-ipcountry"),
            region: header_or_unknown(headers, "cf-region"),
            city: header_or_unknown(headers, "cf-ipcity"),
            latitude: header_or_unknown(headers, "cf-iplatitude"),
            longitude: header_or_unknown(headers, "cf-iplongitude"),
            timezone: header_or_unknown(headers, "cf-timezone"),
        }
    }
}

/// Trusted client IP, or the literal `"unknown"` when the edge did not
/// supply one. Used both for reflection and as the rate-limit identity.
pub fn client_ip(headers: &HeaderMap) -> String {
    header_or_unknown(headers, CLIENT_IP_HEADER)
}

/// The inbound `traceparent` value, if any. Opaque: echoed, never parsed.
pub fn traceparent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TRACEPARENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Verbatim name→value map of every inbound header. Non-UTF-8 values are
/// replaced lossily; duplicate names keep the last value.
pub fn headers_as_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        map.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    Value::Object(map)
}

fn header_or_unknown(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_metadata_passthrough() {
        let headers = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("cf-colo", "DFW"),
            ("cf-ipcountry", "US"),
        ]);
        let meta = ClientMetadata::from_headers(&headers);
        assert_eq!(meta.ip, "203.0.113.9");
        assert_eq!(meta.colo, "DFW");
        assert_eq!(meta.country, "US");
        assert_eq!(meta.asn, "unknown");
        assert_eq!(meta.timezone, "unknown");
    }

    #[test]
    fn test_client_ip_defaults_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_traceparent_absent_is_none() {
        assert_eq!(traceparent(&HeaderMap::new()), None);
        let headers = headers(&[("traceparent", "00-abc-def-01")]);
        assert_eq!(traceparent(&headers).as_deref(), Some("00-abc-def-01"));
    }

    #[test]
    fn test_headers_as_json_is_verbatim() {
        let headers = headers(&[("user-agent", "probe/1.0"), ("x-custom", "value")]);
        let value = headers_as_json(&headers);
        assert_eq!(value["user-agent"], "probe/1.0");
        assert_eq!(value["x-custom"], "value");
    }
}
