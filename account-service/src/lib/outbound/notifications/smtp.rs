use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::errors::NotificationError;
use crate::account::ports::NotificationSender;
use crate::config::SmtpConfig;
use crate::domain::account::notifications::Notification;

/// Delivers notifications as plain-text email through an SMTP relay (STARTTLS).
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationSender {
    /// Build a sender for the configured relay. No connection is opened until
    /// the first delivery.
    ///
    /// # Errors
    /// * `InvalidAddress` - `from` is not a valid mailbox
    /// * `BuildFailed` - Relay host could not be set up for TLS
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {}", config.from, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotificationError::BuildFailed(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        tracing::info!(
            host = %config.host,
            port = config.port,
            from = %from,
            "SMTP notification sender initialized"
        );

        Ok(Self { transport, from })
    }

    fn message(&self, notification: &Notification) -> Result<Message, NotificationError> {
        let to = notification.recipient.parse::<Mailbox>().map_err(|e| {
            NotificationError::InvalidAddress(format!("{}: {}", notification.recipient, e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| NotificationError::BuildFailed(e.to_string()))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let message = self.message(notification)?;

        self.transport
            .send(message)
            .await
            .map(|response| {
                tracing::debug!(
                    notification_id = %notification.id,
                    code = %response.code(),
                    "SMTP relay accepted message"
                );
            })
            .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))
    }
}
