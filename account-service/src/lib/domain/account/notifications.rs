use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::Account;

/// Outbound plain-text email produced by the domain.
///
/// Built by the service and handed to the notification queue; delivery
/// happens out of band and never affects the originating request.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient: String, subject: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient,
            subject,
            body,
            created_at: Utc::now(),
        }
    }

    /// Greeting sent once an account has been created.
    pub fn welcome(account: &Account) -> Self {
        let body = format!(
            "Hello {},\n\n\
             Welcome to our platform! We're excited to have you on board.\n\n\
             If you have any questions, feel free to reach out to us.\n\n\
             Best regards,\n\
             Livechat team",
            account.name
        );

        Self::new(
            account.email.as_str().to_string(),
            "Welcome to LiveChat".to_string(),
            body,
        )
    }
}
