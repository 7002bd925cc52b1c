use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IdentityClaims;
use super::errors::TokenError;

/// Algorithms accepted on validation. Anything outside the HMAC family is
/// rejected before the signature is looked at.
const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Mints and validates HMAC-signed access tokens.
///
/// The secret and TTL are fixed at construction. Tokens are signed with HS256.
/// Expiry and not-before are enforced here rather than by `jsonwebtoken` so that
/// the boundary is exact (`now >= exp` is expired) and the clock can be supplied
/// by the caller.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Default token lifetime.
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Create an issuer for a secret and token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key (32 bytes or more recommended)
    /// * `ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Secret is empty or TTL is not positive
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidConfiguration(
                "signing secret must not be empty".to_string(),
            ));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidConfiguration(format!(
                "token lifetime must be positive, got {} seconds",
                ttl.num_seconds()
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_FAMILY.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            validation,
            ttl,
        })
    }

    /// Issue a token for a subject, valid from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, user_id: i64, email: &str, now: i64) -> Result<String, TokenError> {
        let claims = IdentityClaims::for_subject(user_id, email, now, self.ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token's signature and timing and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable token or claims are missing
    /// * `AlgorithmMismatch` - Header algorithm is outside the HMAC family
    /// * `InvalidSignature` - Signed with another key or tampered with
    /// * `NotYetValid` - Current time is before `nbf`
    /// * `Expired` - Current time is at or past `exp`
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate a token against an explicit clock value (Unix seconds).
    pub fn validate_at(&self, token: &str, now: i64) -> Result<IdentityClaims, TokenError> {
        let claims = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmMismatch
                }
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.is_not_yet_valid(now) {
            return Err(TokenError::NotYetValid);
        }
        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::hours(24)).expect("valid issuer")
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = issuer();

        let token = issuer.issue(7, "alice@example.com").expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = issuer.validate(&token).expect("Failed to validate token");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_rejects_empty_secret() {
        let result = TokenIssuer::new(b"", Duration::hours(1));
        assert!(matches!(result, Err(TokenError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        assert!(TokenIssuer::new(SECRET, Duration::zero()).is_err());
        assert!(TokenIssuer::new(SECRET, Duration::seconds(-5)).is_err());
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let issuer = TokenIssuer::new(SECRET, Duration::seconds(60)).unwrap();
        let token = issuer.issue_at(1, "a@example.com", 1_000).unwrap();

        assert!(issuer.validate_at(&token, 1_059).is_ok());
        assert_eq!(issuer.validate_at(&token, 1_060), Err(TokenError::Expired));
        assert_eq!(issuer.validate_at(&token, 5_000), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_from_the_past_is_expired() {
        let issuer = issuer();
        let two_days_ago = Utc::now().timestamp() - 2 * 24 * 60 * 60;
        let token = issuer.issue_at(1, "a@example.com", two_days_ago).unwrap();

        assert_eq!(issuer.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_before_is_enforced() {
        let issuer = issuer();
        let token = issuer.issue_at(1, "a@example.com", 10_000).unwrap();

        assert_eq!(issuer.validate_at(&token, 9_999), Err(TokenError::NotYetValid));
        assert!(issuer.validate_at(&token, 10_000).is_ok());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer1 = TokenIssuer::new(b"secret1_at_least_32_bytes_long_key!", Duration::hours(1)).unwrap();
        let issuer2 = TokenIssuer::new(b"secret2_at_least_32_bytes_long_key!", Duration::hours(1)).unwrap();

        let token = issuer1.issue(1, "a@example.com").unwrap();

        assert_eq!(issuer2.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_validate_garbage_is_malformed() {
        let issuer = issuer();

        assert!(matches!(
            issuer.validate("invalid.token.here"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(issuer.validate(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_validate_rejects_non_hmac_algorithm() {
        let issuer = issuer();
        let token = issuer.issue(1, "a@example.com").unwrap();

        // Same payload and signature, header swapped to {"alg":"RS256","typ":"JWT"}
        let mut parts = token.splitn(2, '.');
        let _header = parts.next().unwrap();
        let rest = parts.next().unwrap();
        let forged = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}", rest);

        assert_eq!(issuer.validate(&forged), Err(TokenError::AlgorithmMismatch));
    }

    #[test]
    fn test_validate_rejects_tampered_payload() {
        let issuer = issuer();
        let token = issuer.issue(1, "a@example.com").unwrap();
        let other = issuer.issue(2, "b@example.com").unwrap();

        let token_parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", token_parts[0], other_parts[1], token_parts[2]);

        assert_eq!(issuer.validate(&spliced), Err(TokenError::InvalidSignature));
    }
}
