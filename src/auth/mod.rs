//! Route authentication policy.
//!
//! Every path requires authentication unless it is on the public allow-list.
//! This module only classifies paths; token validation lives elsewhere.

mod mode;
mod routes;

pub use mode::{AuthMode, AuthSettings};
pub use routes::{
    add_public_route, get_public_routes, global, is_authenticated, remove_public_route,
    RouteClassifier, DEFAULT_PUBLIC_ROUTES,
};
