use std::sync::Arc;

use thiserror::Error;

use ems_core::Email;

use crate::password::{PasswordError, PasswordScheme};
use crate::principal::{Principal, UserStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no account for {0}")]
    PrincipalNotFound(String),
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Checks a presented identity and password against stored credentials and,
/// on success, yields the principal to issue a token for.
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordScheme>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, passwords: Arc<dyn PasswordScheme>) -> Self {
        Self { users, passwords }
    }

    pub fn verify(&self, identity: &Email, password: &str) -> Result<Principal, CredentialError> {
        let record = self.users.find_by_identity(identity).ok_or_else(|| {
            tracing::debug!(identity = %identity, "login attempt for unknown identity");
            CredentialError::PrincipalNotFound(identity.to_string())
        })?;

        self.passwords
            .verify(password, &record.password_hash)
            .map_err(|e| {
                match e {
                    PasswordError::Mismatch => {
                        tracing::debug!(identity = %identity, "password mismatch")
                    }
                    // An unparseable hash means the stored record is damaged.
                    other => {
                        tracing::warn!(identity = %identity, error = %other, "unusable stored hash")
                    }
                }
                CredentialError::InvalidCredentials
            })?;

        Ok(record.principal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::Argon2Scheme;
    use crate::principal::{Role, UserRecord};
    use std::collections::HashMap;

    struct FixedUsers(HashMap<Email, UserRecord>);

    impl UserStore for FixedUsers {
        fn find_by_identity(&self, identity: &Email) -> Option<UserRecord> {
            self.0.get(identity).cloned()
        }
    }

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    fn verifier_with(records: Vec<UserRecord>) -> CredentialVerifier {
        let users = FixedUsers(
            records
                .into_iter()
                .map(|r| (r.identity.clone(), r))
                .collect(),
        );
        CredentialVerifier::new(Arc::new(users), Arc::new(Argon2Scheme))
    }

    #[test]
    fn accepts_matching_credentials() {
        let hash = Argon2Scheme.hash("open-sesame").unwrap();
        let verifier = verifier_with(vec![UserRecord {
            identity: email("amy@example.com"),
            password_hash: hash,
            roles: vec![Role::from_static("Developer")],
        }]);

        let principal = verifier.verify(&email("amy@example.com"), "open-sesame").unwrap();
        assert_eq!(principal.identity.as_str(), "amy@example.com");
        assert!(principal.has_role("Developer"));
    }

    #[test]
    fn unknown_identity_is_its_own_error() {
        let verifier = verifier_with(vec![]);
        assert_eq!(
            verifier.verify(&email("ghost@example.com"), "whatever"),
            Err(CredentialError::PrincipalNotFound("ghost@example.com".into()))
        );
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let hash = Argon2Scheme.hash("open-sesame").unwrap();
        let verifier = verifier_with(vec![UserRecord {
            identity: email("amy@example.com"),
            password_hash: hash,
            roles: vec![],
        }]);
        assert_eq!(
            verifier.verify(&email("amy@example.com"), "wrong"),
            Err(CredentialError::InvalidCredentials)
        );
    }

    #[test]
    fn corrupt_stored_hash_reads_as_invalid_credentials() {
        let verifier = verifier_with(vec![UserRecord {
            identity: email("amy@example.com"),
            password_hash: "garbage".into(),
            roles: vec![],
        }]);
        assert_eq!(
            verifier.verify(&email("amy@example.com"), "open-sesame"),
            Err(CredentialError::InvalidCredentials)
        );
    }
}
