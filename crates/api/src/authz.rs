//! API-side ownership enforcement.
//!
//! Handlers load the addressed resource, then ask the route policy table
//! whether the caller must own it. Keeping the decision table-driven means
//! a route's requirement lives in `ems-auth::policy`, not in handler code.

use axum::http::{Method, StatusCode};
use axum::response::Response;

use ems_auth::{AccessPolicy, check_ownership, required_policy};
use ems_core::Email;

use crate::app::errors;
use crate::context::CurrentUser;

/// Enforces the policy declared for `method path` against the loaded
/// resource owner. Public and Authenticated routes need nothing further by
/// the time a handler runs; OwnerOnly compares caller identity to owner.
pub fn enforce_owner(
    method: &Method,
    path: &str,
    user: &CurrentUser,
    owner: &Email,
) -> Result<(), Response> {
    match required_policy(method.as_str(), path) {
        AccessPolicy::OwnerOnly => check_ownership(user.identity(), owner).map_err(|e| {
            tracing::debug!(path, caller = %user.identity(), "ownership check failed");
            errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
        }),
        AccessPolicy::Public | AccessPolicy::Authenticated => Ok(()),
    }
}
