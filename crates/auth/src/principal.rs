use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ems_core::Email;

/// Named capability attached to a principal, e.g. a designation such as
/// `"Developer"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity a request carries once the gate has accepted it.
/// Holds no secrets, so it is safe to clone into handlers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub identity: Email,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(identity: Email, roles: Vec<Role>) -> Self {
        Self { identity, roles }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}

/// Stored credential record for one principal.
#[derive(Clone)]
pub struct UserRecord {
    pub identity: Email,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl UserRecord {
    /// Projects the record into its public identity, dropping the hash.
    pub fn principal(&self) -> Principal {
        Principal::new(self.identity.clone(), self.roles.clone())
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("identity", &self.identity)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Lookup of credential records by identity. Implemented by whatever owns
/// user storage; this crate never touches the storage itself.
pub trait UserStore: Send + Sync {
    fn find_by_identity(&self, identity: &Email) -> Option<UserRecord>;
}

impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    fn find_by_identity(&self, identity: &Email) -> Option<UserRecord> {
        (**self).find_by_identity(identity)
    }
}
