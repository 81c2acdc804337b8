//! Public route allow-list.

use dashmap::DashSet;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Paths that never require authentication out of the box.
pub const DEFAULT_PUBLIC_ROUTES: [&str; 5] = ["/health", "/ready", "/docs", "/openapi.json", "/redoc"];

/// A mutable set of public paths. Anything not in the set is protected.
#[derive(Debug)]
pub struct RouteClassifier {
    public: DashSet<String>,
}

impl Default for RouteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteClassifier {
    /// A classifier seeded with [`DEFAULT_PUBLIC_ROUTES`].
    pub fn new() -> Self {
        let public = DashSet::new();
        for route in DEFAULT_PUBLIC_ROUTES {
            public.insert(route.to_string());
        }
        Self { public }
    }

    /// Whether `path` requires authentication. Exact match only.
    pub fn is_authenticated(&self, path: &str) -> bool {
        !self.public.contains(path)
    }

    /// Snapshot of the public routes. Mutating it does not affect the classifier.
    pub fn public_routes(&self) -> HashSet<String> {
        self.public.iter().map(|route| route.key().clone()).collect()
    }

    pub fn add_public_route(&self, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!(path = %path, "Adding public route");
        self.public.insert(path);
    }

    /// Make `path` protected again. No-op if it was not public.
    pub fn remove_public_route(&self, path: &str) {
        if self.public.remove(path).is_some() {
            tracing::debug!(path = %path, "Removed public route");
        }
    }
}

static PUBLIC_ROUTES: LazyLock<RouteClassifier> = LazyLock::new(RouteClassifier::new);

/// The process-wide classifier used by the free functions in this module.
pub fn global() -> &'static RouteClassifier {
    &PUBLIC_ROUTES
}

/// Whether `path` requires authentication under the process-wide allow-list.
pub fn is_authenticated(path: &str) -> bool {
    PUBLIC_ROUTES.is_authenticated(path)
}

/// Copy of the process-wide public routes.
pub fn get_public_routes() -> HashSet<String> {
    PUBLIC_ROUTES.public_routes()
}

pub fn add_public_route(path: impl Into<String>) {
    PUBLIC_ROUTES.add_public_route(path);
}

pub fn remove_public_route(path: &str) {
    PUBLIC_ROUTES.remove_public_route(path);
}
