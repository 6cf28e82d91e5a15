//! `ems-auth` — authentication/authorization core for the employee service.
//!
//! Everything in this crate is transport-agnostic: no HTTP types, no
//! storage. The API crate adapts these pieces to its middleware and
//! handlers, and the directory crate implements the [`UserStore`]
//! collaborator.

pub mod claims;
pub mod credentials;
pub mod keys;
pub mod ownership;
pub mod password;
pub mod policy;
pub mod principal;
pub mod token;

pub use claims::{AccessClaims, ClaimsError, validate_window};
pub use credentials::{CredentialError, CredentialVerifier};
pub use keys::{KeyError, KeyMode, SigningKey};
pub use ownership::{OwnershipError, check_ownership};
pub use password::{Argon2Scheme, PasswordError, PasswordScheme};
pub use policy::{AccessPolicy, ROUTE_POLICIES, RoutePolicy, is_public, required_policy};
pub use principal::{Principal, Role, UserRecord, UserStore};
pub use token::{TokenCodec, TokenError, TokenVerifier};
