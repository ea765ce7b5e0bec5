//! Route cost classification.
//!
//! # Design Decisions
//! - The table is built once at startup and injected through AppState,
//!   never a mutable global (no hidden cross-test state)
//! - Exact-string path matching only

use std::collections::HashSet;

/// Paths that require the probe token.
pub const EXPENSIVE: &[&str] = &["/speed", "/upload", "/echo"];

/// Paths that are free but rate limited.
pub const FREE_LIMITED: &[&str] = &["/ping", "/info", "/healthz", "/headers", "/version"];

/// Cost tier of a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Expensive,
    FreeLimited,
    Unclassified,
}

/// Immutable classification table.
#[derive(Debug)]
pub struct RouteTable {
    expensive: HashSet<&'static str>,
    free_limited: HashSet<&'static str>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            expensive: EXPENSIVE.iter().copied().collect(),
            free_limited: FREE_LIMITED.iter().copied().collect(),
        }
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.expensive.contains(path) {
            RouteClass::Expensive
        } else if self.free_limited.contains(path) {
            RouteClass::FreeLimited
        } else {
            RouteClass::Unclassified
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
