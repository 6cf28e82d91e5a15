use thiserror::Error;

use ems_core::Email;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("{0}")]
    Forbidden(String),
}

/// Allows an action only when the caller is the resource owner. Ownership is
/// identity equality, nothing transitive. Both sides are normalized emails,
/// so the comparison is byte-for-byte.
pub fn check_ownership(caller: &Email, owner: &Email) -> Result<(), OwnershipError> {
    if caller == owner {
        Ok(())
    } else {
        Err(OwnershipError::Forbidden(
            "cannot act on another employee's records".into(),
        ))
    }
}
