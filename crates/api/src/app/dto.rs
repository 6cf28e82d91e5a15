//! Request/response DTOs and JSON mapping helpers.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use ems_directory::Employee;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Completing one's own profile after registration. Carries the email so the
/// record can be located; ownership is enforced against it.
#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub email: String,
    pub name: String,
    pub dob: NaiveDate,
    pub mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub dob: NaiveDate,
    pub mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct BankAccountRequest {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Deserialize)]
pub struct DesignationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub name: String,
}

/// Public projection of an employee record. The password hash stays behind.
pub fn employee_to_json(employee: &Employee) -> Value {
    json!({
        "id": employee.id,
        "name": employee.name,
        "email": employee.email,
        "dob": employee.dob,
        "mobile": employee.mobile,
        "designation": employee.designation,
        "skill_ids": employee.skills,
        "account": employee.account,
        "address": employee.address,
    })
}
