use async_trait::async_trait;

use crate::account::errors::NotificationError;
use crate::account::ports::NotificationSender;
use crate::domain::account::notifications::Notification;

/// Sender used when no SMTP relay is configured; records the notification in the log only.
#[derive(Debug, Default, Clone)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        tracing::info!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            subject = %notification.subject,
            "SMTP not configured, notification logged only"
        );
        Ok(())
    }
}
