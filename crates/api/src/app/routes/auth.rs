use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};

use ems_core::Email;
use ems_directory::validate_name;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let email = match Email::parse(&body.email) {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = validate_name(&body.name) {
        return errors::domain_error_to_response(e);
    }
    if body.password.len() < 8 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password must be at least 8 characters",
        );
    }

    let hash = match services.passwords.hash(&body.password) {
        Ok(h) => h,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hashing_error",
                e.to_string(),
            );
        }
    };

    let employee = match services
        .employees
        .register(email, hash, body.name.trim().to_string())
    {
        Ok(emp) => emp,
        Err(e) => return errors::domain_error_to_response(e),
    };

    tracing::info!(id = %employee.id, "employee registered");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": employee.id,
            "email": employee.email,
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let email = match Email::parse(&body.email) {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let principal = match services.credentials.verify(&email, &body.password) {
        Ok(p) => p,
        Err(e) => return errors::credential_error_to_response(e),
    };

    let token = match services.tokens.issue(principal.identity.as_str()) {
        Ok(t) => t,
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                e.to_string(),
            );
        }
    };

    tracing::info!(identity = %principal.identity, "login succeeded");

    // The token rides in the Authorization response header as well as the
    // body, so header-only clients can pick it up.
    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "token_type": "Bearer",
        })),
    )
        .into_response();
    if let Ok(value) = header::HeaderValue::from_str(&format!("Bearer {token}")) {
        response.headers_mut().insert(header::AUTHORIZATION, value);
    }
    response
}
