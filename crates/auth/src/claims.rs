use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried inside an access token.
///
/// Timestamps are unix seconds so the wire form stays compact and the
/// comparison rules below are exact. Sub-second precision is deliberately
/// dropped at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Identity of the principal the token was issued to.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. The token is valid strictly before this instant.
    pub exp: i64,
}

impl AccessClaims {
    /// Builds claims for `subject` issued at `issued_at` and valid for
    /// `validity` from that instant.
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, validity: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.into(),
            iat,
            exp: iat + validity.num_seconds(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("invalid validity window")]
    InvalidWindow,
}

/// Checks the validity window of already-decoded claims against `now`.
///
/// Signature verification happens in the token codec; this is the pure time
/// logic, kept separate so it can be tested without minting real tokens.
/// A token is live in the half-open interval `[iat, exp)`.
pub fn validate_window(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), ClaimsError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(ClaimsError::InvalidWindow);
    }
    if now < claims.iat {
        return Err(ClaimsError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(ClaimsError::Expired);
    }
    Ok(())
}
