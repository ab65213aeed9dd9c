//! Route table module
//!
//! Exact path matches first, then the catch-all root route.

use std::collections::HashMap;

/// Handler capability a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Home,
    Upload,
    Download,
}

/// Mapping from request path to endpoint, built once at startup
#[derive(Debug, Clone)]
pub struct RouteTable {
    exact: HashMap<String, Endpoint>,
    fallback: Option<Endpoint>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            fallback: None,
        }
    }

    /// `/upload`, `/download`, and `/` catching everything else
    pub fn standard() -> Self {
        Self::new()
            .route("/", Endpoint::Home)
            .route("/upload", Endpoint::Upload)
            .route("/download", Endpoint::Download)
            .fallback(Endpoint::Home)
    }

    #[must_use]
    pub fn route(mut self, path: &str, endpoint: Endpoint) -> Self {
        self.exact.insert(path.to_string(), endpoint);
        self
    }

    #[must_use]
    pub const fn fallback(mut self, endpoint: Endpoint) -> Self {
        self.fallback = Some(endpoint);
        self
    }

    /// Find the endpoint for a request path
    pub fn resolve(&self, path: &str) -> Option<Endpoint> {
        self.exact.get(path).copied().or(self.fallback)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
