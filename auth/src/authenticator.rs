use std::sync::Arc;
use std::sync::OnceLock;

use crate::gate::AuthorizationGate;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::IdentityClaims;
use crate::token::TokenError;
use crate::token::TokenIssuer;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    decoy_hash: OnceLock<Option<String>>,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher used for new and stored credentials
    /// * `token_issuer` - Issuer holding the signing secret
    pub fn new(password_hasher: PasswordHasher, token_issuer: TokenIssuer) -> Self {
        Self {
            password_hasher,
            token_issuer: Arc::new(token_issuer),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Gate sharing this authenticator's issuer, for protecting requests.
    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(Arc::clone(&self.token_issuer))
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject_id` - Account identifier to embed in the token
    /// * `email` - Account email to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: i64,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue(subject_id, email)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an unknown account.
    ///
    /// Runs a verification against a decoy hash first so that an unknown
    /// account costs the same time as a wrong password.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash("decoy-password").ok());

        if let Some(hash) = decoy {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification (e.g. right after registration).
    ///
    /// # Errors
    /// * `SigningFailed` - Token generation failed
    pub fn issue_token(&self, subject_id: i64, email: &str) -> Result<String, TokenError> {
        self.token_issuer.issue(subject_id, email)
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.token_issuer.validate(token)
    }
}
