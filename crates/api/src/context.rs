use ems_auth::{Principal, Role};
use ems_core::Email;

/// Authenticated caller for a request.
///
/// Inserted into request extensions by the gate, extracted by handlers.
/// Created and dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    identity: Email,
    roles: Vec<Role>,
}

impl CurrentUser {
    pub fn new(identity: Email, roles: Vec<Role>) -> Self {
        Self { identity, roles }
    }

    pub fn from_principal(principal: Principal) -> Self {
        Self::new(principal.identity, principal.roles)
    }

    pub fn identity(&self) -> &Email {
        &self.identity
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}
