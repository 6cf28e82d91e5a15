//! Shared service construction: one directory, one token codec, one
//! credential verifier, wired together behind their seams.

use std::sync::Arc;

use chrono::Duration;

use ems_auth::{
    Argon2Scheme, CredentialVerifier, PasswordScheme, Role, SigningKey, TokenCodec, UserRecord,
    UserStore,
};
use ems_core::Email;
use ems_directory::{EmployeeDirectory, InMemoryDirectory, SkillCatalog};

/// Exposes directory employees to the auth layer as credential records.
/// The job designation surfaces as a principal role.
pub struct DirectoryUserStore {
    employees: Arc<dyn EmployeeDirectory>,
}

impl DirectoryUserStore {
    pub fn new(employees: Arc<dyn EmployeeDirectory>) -> Self {
        Self { employees }
    }
}

impl UserStore for DirectoryUserStore {
    fn find_by_identity(&self, identity: &Email) -> Option<UserRecord> {
        let employee = self.employees.find_by_email(identity)?;
        let roles = employee
            .designation
            .iter()
            .map(|d| Role::new(d.name.clone()))
            .collect();
        Some(UserRecord {
            identity: employee.email,
            password_hash: employee.password_hash,
            roles,
        })
    }
}

/// Services handed to handlers through request extensions.
pub struct AppServices {
    pub employees: Arc<dyn EmployeeDirectory>,
    pub skills: Arc<dyn SkillCatalog>,
    pub tokens: Arc<TokenCodec>,
    pub users: Arc<dyn UserStore>,
    pub credentials: CredentialVerifier,
    pub passwords: Arc<dyn PasswordScheme>,
}

impl AppServices {
    pub fn new(signing_key: &SigningKey, token_validity: Duration) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let employees: Arc<dyn EmployeeDirectory> = directory.clone();
        let skills: Arc<dyn SkillCatalog> = directory;

        let tokens = Arc::new(TokenCodec::new(signing_key, token_validity));
        let users: Arc<dyn UserStore> = Arc::new(DirectoryUserStore::new(employees.clone()));
        let passwords: Arc<dyn PasswordScheme> = Arc::new(Argon2Scheme);
        let credentials = CredentialVerifier::new(users.clone(), passwords.clone());

        Self {
            employees,
            skills,
            tokens,
            users,
            credentials,
            passwords,
        }
    }
}
