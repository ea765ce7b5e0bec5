//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the probe handlers
//! - Wire up middleware (timeout, tracing, request ID, protection gates)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Design Decisions
//! - Exact-path routes only; a method mismatch on a known path falls
//!   through to the same 404 fallback as an unknown path, not a 405
//! - An outer response mapper re-applies the security headers so even
//!   extractor rejections and timeouts carry the full set

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProbeConfig;
use crate::handlers::{diagnostics, payload};
use crate::http::response::{apply_security_headers, SecureResponse};
use crate::observability::metrics;
use crate::protection::{auth, rate_limit, RouteTable};
use crate::store::{MemoryStore, RateLimitStore};

/// Interval for sweeping expired counters out of the in-process store.
const STORE_PURGE_INTERVAL: Duration = Duration::from_secs(120);

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProbeConfig>,
    pub store: Arc<dyn RateLimitStore>,
    pub routes: Arc<RouteTable>,
}

/// HTTP server for the probe service.
pub struct HttpServer {
    router: Router,
    memory_store: Option<Arc<MemoryStore>>,
}

impl HttpServer {
    /// Create a server with the default in-process rate-limit store.
    pub fn new(config: ProbeConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut server = Self::with_store(config, store.clone());
        server.memory_store = Some(store);
        server
    }

    /// Create a server bound to an externally supplied rate-limit store.
    pub fn with_store(config: ProbeConfig, store: Arc<dyn RateLimitStore>) -> Self {
        let state = AppState {
            config: Arc::new(config),
            store,
            routes: Arc::new(RouteTable::new()),
        };
        let router = Self::build_router(state);
        Self {
            router,
            memory_store: None,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let max_body = state.config.payload.max_bytes as usize;
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

        Router::new()
            .route("/ping", get(diagnostics::ping).fallback(fallback_handler))
            .route("/info", get(diagnostics::info).fallback(fallback_handler))
            .route(
                "/headers",
                get(diagnostics::headers).fallback(fallback_handler),
            )
            .route(
                "/version",
                get(diagnostics::version).fallback(fallback_handler),
            )
            .route(
                "/healthz",
                get(diagnostics::healthz).fallback(fallback_handler),
            )
            .route("/echo", post(diagnostics::echo).fallback(fallback_handler))
            .route("/speed", get(payload::speed).fallback(fallback_handler))
            .route("/upload", post(payload::upload).fallback(fallback_handler))
            .fallback(fallback_handler)
            .layer(DefaultBodyLimit::max(max_body))
            .with_state(state.clone())
            // Later layers wrap earlier ones: requests see the auth gate
            // before the limiter, and the security-header mapper is
            // outermost so even timeout responses carry the set.
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                state,
                auth::auth_middleware,
            ))
            .layer(middleware::from_fn(track_request))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(middleware::map_response(force_security_headers))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(store) = self.memory_store {
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(STORE_PURGE_INTERVAL);
                loop {
                    ticker.tick().await;
                    store.purge_expired();
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Default fallback for every unmatched (path, method) pair.
///
/// A wrong method on a registered path intentionally lands here too.
async fn fallback_handler() -> SecureResponse {
    SecureResponse::json(json!({ "error": "Not Found" })).status(StatusCode::NOT_FOUND)
}

/// Outermost guarantee that no response escapes without the fixed header
/// set, including rejections produced inside the framework.
async fn force_security_headers(mut response: Response) -> Response {
    apply_security_headers(response.headers_mut());
    response
}

/// Record request counters and latency for every response.
async fn track_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_fallback_is_json_not_found() {
        let response = fallback_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .unwrap(),
            "application/json"
        );
    }
}
