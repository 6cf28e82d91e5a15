use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(user): Extension<crate::context::CurrentUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "identity": user.identity().as_str(),
        "roles": user.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
