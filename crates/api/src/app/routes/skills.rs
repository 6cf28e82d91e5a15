use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use ems_core::SkillId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

/// Shared skill catalog under `/v1/skills`.
pub fn catalog_router() -> Router {
    Router::new().route("/", get(list_skills).post(create_skill))
}

/// Per-employee assignments, nested under `/v1/employees/:id/skills`.
pub fn assignment_router() -> Router {
    Router::new()
        .route("/", get(list_employee_skills))
        .route("/:skill_id", post(assign_skill).delete(unassign_skill))
}

pub async fn list_skills(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services.skills.list_skills();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SkillRequest>,
) -> axum::response::Response {
    match services.skills.add_skill(&body.name) {
        Ok(skill) => (StatusCode::CREATED, Json(skill)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_employee_skills(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }

    match services.employees.skills_of(employee.id) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn assign_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path((id, skill_id)): Path<(String, String)>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }
    let skill_id: SkillId = match skill_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.employees.assign_skill(employee.id, skill_id) {
        Ok(skill) => (StatusCode::CREATED, Json(skill)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unassign_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path((id, skill_id)): Path<(String, String)>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }
    let skill_id: SkillId = match skill_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.employees.unassign_skill(employee.id, skill_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
