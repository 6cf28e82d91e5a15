use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
};

use ems_directory::{Designation, validate_name};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/", get(get_role).put(set_role).delete(clear_role))
}

pub async fn get_role(
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

    match employee.designation {
        Some(designation) => (StatusCode::OK, Json(designation)).into_response(),
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("employee {} has no designation", employee.id),
        ),
    }
}

/// Sets or replaces the job designation. New tokens pick it up as a role on
/// the next principal resolve.
pub async fn set_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<dto::DesignationRequest>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }
    if let Err(e) = validate_name(&body.name) {
        return errors::domain_error_to_response(e);
    }

    let designation = Designation {
        name: body.name.trim().to_string(),
    };
    match services.employees.set_designation(employee.id, designation) {
        Ok(designation) => (StatusCode::OK, Json(designation)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clear_role(
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

    match services.employees.clear_designation(employee.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
