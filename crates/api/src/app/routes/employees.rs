use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use ems_core::Email;
use ems_directory::{EmployeeProfile, validate_profile};

use crate::app::routes::{accounts, addresses, common, roles, skills};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", post(complete_profile).get(list_employees))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .nest("/:id/account", accounts::router())
        .nest("/:id/address", addresses::router())
        .nest("/:id/role", roles::router())
        .nest("/:id/skills", skills::assignment_router())
}

/// Fills in the profile of an already-registered employee. The record is
/// located by the email in the body; only its owner may complete it.
pub async fn complete_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<dto::CompleteProfileRequest>,
) -> axum::response::Response {
    let email = match Email::parse(&body.email) {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &email) {
        return resp;
    }

    let employee = match services.employees.find_by_email(&email) {
        Some(e) => e,
        None => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("no registration for {email}"),
            );
        }
    };

    let profile = EmployeeProfile {
        name: body.name,
        dob: body.dob,
        mobile: body.mobile,
    };
    if let Err(e) = validate_profile(&profile, Utc::now().date_naive()) {
        return errors::domain_error_to_response(e);
    }

    match services.employees.update_profile(employee.id, profile) {
        Ok(updated) => (StatusCode::OK, Json(dto::employee_to_json(&updated))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .employees
        .list()
        .iter()
        .map(dto::employee_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_employee(
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
    (StatusCode::OK, Json(dto::employee_to_json(&employee))).into_response()
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProfileRequest>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }

    let profile = EmployeeProfile {
        name: body.name,
        dob: body.dob,
        mobile: body.mobile,
    };
    if let Err(e) = validate_profile(&profile, Utc::now().date_naive()) {
        return errors::domain_error_to_response(e);
    }

    match services.employees.update_profile(employee.id, profile) {
        Ok(updated) => (StatusCode::OK, Json(dto::employee_to_json(&updated))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Soft delete. The record disappears from every lookup, which also kills
/// the owner's outstanding tokens at the gate's principal-resolve step.
pub async fn delete_employee(
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

    match services.employees.soft_delete(employee.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
