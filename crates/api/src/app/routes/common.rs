//! Helpers shared by the resource route modules.

use axum::http::StatusCode;

use ems_core::EmployeeId;
use ems_directory::Employee;

use crate::app::errors;
use crate::app::services::AppServices;

/// Parses an `:id` path segment and loads the active employee behind it.
/// Soft-deleted and unknown ids both come back as 404.
pub fn load_employee(
    services: &AppServices,
    raw_id: &str,
) -> Result<Employee, axum::response::Response> {
    let id: EmployeeId = raw_id.parse().map_err(errors::domain_error_to_response)?;
    services.employees.get(id).ok_or_else(|| {
        errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("employee {id}"))
    })
}

/// Requires a non-blank value, trimmed.
pub fn require_field(
    value: &str,
    field: &'static str,
) -> Result<String, axum::response::Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} must not be blank"),
        ));
    }
    Ok(trimmed.to_string())
}
