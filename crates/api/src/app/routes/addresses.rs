use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
};

use ems_directory::AddressDraft;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route(
        "/",
        get(get_address).post(create_address).delete(delete_address),
    )
}

pub async fn get_address(
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

    match employee.address {
        Some(address) => (StatusCode::OK, Json(address)).into_response(),
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("employee {} has no address", employee.id),
        ),
    }
}

pub async fn create_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<dto::AddressRequest>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }

    let draft = AddressDraft {
        street: match common::require_field(&body.street, "street") {
            Ok(v) => v,
            Err(resp) => return resp,
        },
        city: match common::require_field(&body.city, "city") {
            Ok(v) => v,
            Err(resp) => return resp,
        },
        state: match common::require_field(&body.state, "state") {
            Ok(v) => v,
            Err(resp) => return resp,
        },
        zip: match common::require_field(&body.zip, "zip") {
            Ok(v) => v,
            Err(resp) => return resp,
        },
    };

    match services.employees.attach_address(employee.id, draft) {
        Ok(address) => (StatusCode::CREATED, Json(address)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_address(
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

    match services.employees.remove_address(employee.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
