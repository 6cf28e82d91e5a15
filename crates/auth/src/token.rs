use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::claims::{AccessClaims, ClaimsError, validate_window};
use crate::keys::SigningKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Verification side of the codec, the only capability request handling
/// needs. Issuing stays on the concrete [`TokenCodec`].
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}

/// Issues and verifies HS256 bearer tokens.
///
/// The signing key is fixed at construction. Rotating the key means building
/// a new codec, which invalidates everything the old one issued.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenCodec {
    pub fn new(key: &SigningKey, validity: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validity,
        }
    }

    /// Issues a token for `subject` valid from now for the configured window.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token with an explicit issue instant. Lets callers mint
    /// already-expired tokens in tests instead of sleeping through the window.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AccessClaims::new(subject, issued_at, self.validity);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies signature and validity window, returning the claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = decode::<AccessClaims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        // jsonwebtoken treats exp == now as live; the window check is strict.
        validate_window(&data.claims, Utc::now()).map_err(|e| match e {
            ClaimsError::Expired => TokenError::Expired,
            ClaimsError::NotYetValid | ClaimsError::InvalidWindow => TokenError::Invalid,
        })?;

        Ok(data.claims)
    }

    /// Verifies the token and returns its subject.
    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.verify(token)?.sub)
    }

    /// Verifies the token and projects one value out of its claims.
    pub fn claim<T>(
        &self,
        token: &str,
        select: impl FnOnce(&AccessClaims) -> T,
    ) -> Result<T, TokenError> {
        Ok(select(&self.verify(token)?))
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

impl TokenVerifier for TokenCodec {
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        TokenCodec::verify(self, token)
    }
}
