use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use ems_auth::{TokenError, TokenVerifier, UserStore, policy};
use ems_core::Email;

use crate::app::errors;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
    pub users: Arc<dyn UserStore>,
}

/// Why the gate refused a request. Every variant maps to 401; the body code
/// tells clients which precondition failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("authorization header is missing")]
    MissingHeader,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("token is invalid")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("token subject is not a known principal")]
    UnknownPrincipal,
}

impl AuthRejection {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_authorization",
            Self::MalformedHeader => "malformed_authorization",
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::UnknownPrincipal => "unknown_principal",
        }
    }
}

/// Request gate. Runs once per request, ahead of every route.
///
/// Public paths pass straight through with no identity bound. Everything
/// else must present a bearer token that verifies and resolves to a known
/// principal, which is then bound to the request as [`CurrentUser`].
pub async fn auth_gate(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if policy::is_public(req.uri().path()) {
        return next.run(req).await;
    }

    // Re-entry with an identity already bound short-circuits.
    if req.extensions().get::<CurrentUser>().is_some() {
        return next.run(req).await;
    }

    match authenticate(&state, req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(rejection) => {
            tracing::debug!(path = req.uri().path(), %rejection, "request rejected");
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                rejection.code(),
                rejection.to_string(),
            )
        }
    }
}

fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<CurrentUser, AuthRejection> {
    let token = extract_bearer(headers)?;

    let claims = state.tokens.verify(token).map_err(|e| match e {
        TokenError::Expired => AuthRejection::ExpiredToken,
        TokenError::Invalid | TokenError::Encoding(_) => AuthRejection::InvalidToken,
    })?;

    // A signed subject that does not parse as an identity cannot be in the
    // store, so it gets the same answer as a lookup miss.
    let identity = Email::parse(&claims.sub).map_err(|_| AuthRejection::UnknownPrincipal)?;
    let record = state
        .users
        .find_by_identity(&identity)
        .ok_or(AuthRejection::UnknownPrincipal)?;

    Ok(CurrentUser::from_principal(record.principal()))
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingHeader)?;

    let header = header.to_str().map_err(|_| AuthRejection::MalformedHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthRejection::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthRejection::MalformedHeader);
    }

    Ok(token)
}
