//! Declarative access policy for the HTTP surface.
//!
//! Every route's authorization requirement lives in one table instead of
//! being scattered across handlers. The request gate derives its public
//! exemptions from here, handlers look up whether they must enforce
//! ownership, and tests assert the table directly.

/// What a caller must prove before the route runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No credentials at all.
    Public,
    /// A valid token bound to a known principal.
    Authenticated,
    /// Authenticated, and the principal must own the addressed resource.
    OwnerOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    pub method: &'static str,
    /// Path pattern; `:name` segments match any single segment.
    pub pattern: &'static str,
    pub policy: AccessPolicy,
}

const fn route(method: &'static str, pattern: &'static str, policy: AccessPolicy) -> RoutePolicy {
    RoutePolicy {
        method,
        pattern,
        policy,
    }
}

use AccessPolicy::{Authenticated, OwnerOnly, Public};

pub const ROUTE_POLICIES: &[RoutePolicy] = &[
    route("POST", "/v1/auth/register", Public),
    route("POST", "/v1/auth/login", Public),
    route("GET", "/health", Public),
    route("GET", "/whoami", Authenticated),
    route("GET", "/v1/employees", Authenticated),
    route("POST", "/v1/employees", OwnerOnly),
    route("GET", "/v1/employees/:id", OwnerOnly),
    route("PUT", "/v1/employees/:id", OwnerOnly),
    route("DELETE", "/v1/employees/:id", OwnerOnly),
    route("GET", "/v1/employees/:id/account", OwnerOnly),
    route("POST", "/v1/employees/:id/account", OwnerOnly),
    route("PUT", "/v1/employees/:id/account", OwnerOnly),
    route("DELETE", "/v1/employees/:id/account", OwnerOnly),
    route("GET", "/v1/employees/:id/address", OwnerOnly),
    route("POST", "/v1/employees/:id/address", OwnerOnly),
    route("DELETE", "/v1/employees/:id/address", OwnerOnly),
    route("GET", "/v1/employees/:id/skills", OwnerOnly),
    route("POST", "/v1/employees/:id/skills/:skill_id", OwnerOnly),
    route("DELETE", "/v1/employees/:id/skills/:skill_id", OwnerOnly),
    route("GET", "/v1/employees/:id/role", OwnerOnly),
    route("PUT", "/v1/employees/:id/role", OwnerOnly),
    route("DELETE", "/v1/employees/:id/role", OwnerOnly),
    route("GET", "/v1/skills", Authenticated),
    route("POST", "/v1/skills", Authenticated),
];

/// Policy for a concrete request. Routes missing from the table require
/// authentication, so forgetting a row can never open a hole.
pub fn required_policy(method: &str, path: &str) -> AccessPolicy {
    ROUTE_POLICIES
        .iter()
        .find(|r| r.method.eq_ignore_ascii_case(method) && pattern_matches(r.pattern, path))
        .map(|r| r.policy)
        .unwrap_or(AccessPolicy::Authenticated)
}

/// Whether the path is exempt from authentication for any method. Mirrors
/// the login/register carve-out of the request gate.
pub fn is_public(path: &str) -> bool {
    ROUTE_POLICIES
        .iter()
        .any(|r| r.policy == Public && pattern_matches(r.pattern, path))
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.trim_end_matches('/').split('/');
    let mut actual = path.trim_end_matches('/').split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(seg), Some(got)) => {
                if seg.starts_with(':') {
                    if got.is_empty() {
                        return false;
                    }
                } else if seg != got {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
