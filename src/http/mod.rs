//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch, middleware stack)
//!     → protection layer (auth gate, rate limiter)
//!     → handlers
//!     → response.rs (secure response builder)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::SecureResponse;
pub use server::{AppState, HttpServer};
