use axum::{Router, routing::get};

pub mod accounts;
pub mod addresses;
pub mod auth;
pub mod common;
pub mod employees;
pub mod roles;
pub mod skills;
pub mod system;

/// Router for every endpoint behind the gate. The public auth routes are
/// wired here too; the gate exempts them by path.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/v1/auth", auth::router())
        .nest("/v1/employees", employees::router())
        .nest("/v1/skills", skills::catalog_router())
}
