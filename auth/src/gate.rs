use std::sync::Arc;

use thiserror::Error;

use crate::token::TokenError;
use crate::token::TokenIssuer;

const BEARER_SCHEME: &str = "Bearer";

/// Reasons a request failed the authorization gate.
///
/// All variants mean "unauthorized" to the client; the distinction exists for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("Bearer token rejected: {0}")]
    InvalidToken(#[from] TokenError),
}

/// Identity established for one request by the gate.
///
/// Only [`AuthorizationGate::authorize`] can produce this value, so holding one
/// is proof that the request carried a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    subject_id: i64,
    email: String,
}

impl AuthenticatedContext {
    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Request-scoped check turning an `Authorization` header value into an
/// [`AuthenticatedContext`].
#[derive(Clone)]
pub struct AuthorizationGate {
    issuer: Arc<TokenIssuer>,
}

impl AuthorizationGate {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Authorize a request from its raw `Authorization` header.
    ///
    /// # Arguments
    /// * `header` - Header value, `None` when the request carried none
    ///
    /// # Errors
    /// * `MissingCredentials` - No header
    /// * `MalformedHeader` - Not of the form `Bearer <token>`
    /// * `InvalidToken` - Token failed validation
    pub fn authorize(&self, header: Option<&str>) -> Result<AuthenticatedContext, GateError> {
        let header = header.ok_or(GateError::MissingCredentials)?;
        let token = extract_bearer_token(header)?;
        let claims = self.issuer.validate(token)?;

        Ok(AuthenticatedContext {
            subject_id: claims.user_id,
            email: claims.email,
        })
    }
}

fn extract_bearer_token(header: &str) -> Result<&str, GateError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(GateError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(GateError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(GateError::MalformedHeader);
    }

    Ok(token)
}
