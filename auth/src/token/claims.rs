use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried inside a signed access token.
///
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Account identifier of the subject
    pub user_id: i64,

    /// Account email at the time the token was issued
    pub email: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,
}

impl IdentityClaims {
    /// Build claims for a subject, valid from `now` for `ttl`.
    pub fn for_subject(user_id: i64, email: impl Into<String>, now: i64, ttl: Duration) -> Self {
        Self {
            user_id,
            email: email.into(),
            iat: now,
            nbf: now,
            exp: now + ttl.num_seconds(),
        }
    }

    /// Expired once the clock reaches `exp`; there is no leeway.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn is_not_yet_valid(&self, current_timestamp: i64) -> bool {
        current_timestamp < self.nbf
    }
}
