//! Authentication core
//!
//! Provides the credential and token machinery used by the account service:
//! - Password hashing (Argon2id)
//! - HMAC-signed access tokens with strict expiry
//! - An authorization gate for bearer credentials
//!
//! Nothing here holds global state; the signing secret is passed in at construction.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let token = issuer.issue(42, "alice@example.com").unwrap();
//! let claims = issuer.validate(&token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let auth = Authenticator::new(PasswordHasher::new(), issuer);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, 42, "alice@example.com").unwrap();
//!
//! // Protected request: run the gate on the Authorization header
//! let header = format!("Bearer {}", result.access_token);
//! let context = auth.gate().authorize(Some(&header)).unwrap();
//! assert_eq!(context.subject_id(), 42);
//! ```

pub mod authenticator;
pub mod gate;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use gate::AuthenticatedContext;
pub use gate::AuthorizationGate;
pub use gate::GateError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::IdentityClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
