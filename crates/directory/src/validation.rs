//! Field checks for employee profile input, applied before anything reaches
//! the store.

use chrono::NaiveDate;

use ems_core::DomainError;

use crate::records::EmployeeProfile;

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name must not be blank"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(DomainError::validation(
            "name must contain only letters and spaces",
        ));
    }
    Ok(())
}

pub fn validate_mobile(mobile: &str) -> Result<(), DomainError> {
    if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(
            "mobile number must be exactly 10 digits",
        ));
    }
    Ok(())
}

pub fn validate_dob(dob: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if dob > today {
        return Err(DomainError::validation(
            "date of birth must not be in the future",
        ));
    }
    Ok(())
}

/// Runs every profile check and reports all failures in one error.
pub fn validate_profile(profile: &EmployeeProfile, today: NaiveDate) -> Result<(), DomainError> {
    let checks = [
        validate_name(&profile.name),
        validate_mobile(&profile.mobile),
        validate_dob(profile.dob, today),
    ];

    let mut problems = Vec::new();
    for check in checks {
        if let Err(DomainError::Validation(msg)) = check {
            problems.push(msg);
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(problems.join("; ")))
    }
}
