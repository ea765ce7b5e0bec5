//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use edge_probe::config::ProbeConfig;
use edge_probe::http::HttpServer;
use edge_probe::store::RateLimitStore;

pub const TEST_TOKEN: &str = "test-probe-secret";
pub const TOKEN_HEADER: &str = "x-api-probe-token";

/// Default test configuration: secret set, metrics off.
pub fn test_config() -> ProbeConfig {
    let mut config = ProbeConfig::default();
    config.auth.probe_token = TEST_TOKEN.to_string();
    config.observability.metrics_enabled = false;
    config
}

/// Spawn a probe server on an ephemeral loopback port.
pub async fn spawn_server(config: ProbeConfig) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Spawn a server wired to a caller-provided rate-limit store.
#[allow(dead_code)]
pub async fn spawn_server_with_store(
    config: ProbeConfig,
    store: Arc<dyn RateLimitStore>,
) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::with_store(config, store);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Non-pooled client so each request exercises a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
