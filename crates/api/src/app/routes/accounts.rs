use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
};

use ems_directory::BankAccountDraft;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route(
        "/",
        get(get_account)
            .post(create_account)
            .put(update_account)
            .delete(delete_account),
    )
}

fn draft_from(body: dto::BankAccountRequest) -> Result<BankAccountDraft, axum::response::Response> {
    Ok(BankAccountDraft {
        bank_name: common::require_field(&body.bank_name, "bank_name")?,
        account_number: common::require_field(&body.account_number, "account_number")?,
        ifsc_code: common::require_field(&body.ifsc_code, "ifsc_code")?,
    })
}

pub async fn get_account(
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

    match employee.account {
        Some(account) => (StatusCode::OK, Json(account)).into_response(),
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("employee {} has no bank account", employee.id),
        ),
    }
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<dto::BankAccountRequest>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }
    let draft = match draft_from(body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.employees.attach_account(employee.id, draft) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<dto::BankAccountRequest>,
) -> axum::response::Response {
    let employee = match common::load_employee(&services, &id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    if let Err(resp) = authz::enforce_owner(&method, uri.path(), &user, &employee.email) {
        return resp;
    }
    let draft = match draft_from(body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.employees.update_account(employee.id, draft) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_account(
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

    match services.employees.remove_account(employee.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
