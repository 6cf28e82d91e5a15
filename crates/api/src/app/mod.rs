//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared service construction (directory, codec, verifier)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use chrono::Duration;
use tower::ServiceBuilder;

use ems_auth::SigningKey;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests). The gate wraps every route, including the public ones;
/// exemption is decided inside it from the policy table.
pub fn build_app(signing_key: &SigningKey, token_validity: Duration) -> Router {
    let services = Arc::new(services::AppServices::new(signing_key, token_validity));
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
        users: services.users.clone(),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::auth_gate,
                ))
                .layer(Extension(services)),
        )
}
