use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::account::errors::NotificationError;
use crate::account::ports::NotificationQueue;
use crate::account::ports::NotificationSender;
use crate::domain::account::notifications::Notification;

pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Bounded in-process queue feeding a single delivery worker.
///
/// `enqueue` never waits: when the buffer is full the notification is
/// rejected with `QueueFull` and the caller decides whether to care.
#[derive(Clone)]
pub struct ChannelNotificationQueue {
    sender: mpsc::Sender<Notification>,
}

/// Drains the queue and hands each notification to a sender.
pub struct NotificationWorker<NS: NotificationSender> {
    receiver: mpsc::Receiver<Notification>,
    sender: Arc<NS>,
}

impl ChannelNotificationQueue {
    /// Create a queue and its worker. The worker must be spawned for anything
    /// to be delivered.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of pending notifications (at least 1)
    /// * `sender` - Delivery implementation used by the worker
    pub fn new<NS: NotificationSender>(
        capacity: usize,
        sender: Arc<NS>,
    ) -> (Self, NotificationWorker<NS>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self { sender: tx },
            NotificationWorker {
                receiver: rx,
                sender,
            },
        )
    }
}

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, notification: Notification) -> Result<(), NotificationError> {
        let id = notification.id.clone();

        self.sender
            .try_send(notification)
            .map(|_| tracing::debug!(notification_id = %id, "Notification queued"))
            .map_err(|e| match e {
                TrySendError::Full(_) => NotificationError::QueueFull,
                TrySendError::Closed(_) => NotificationError::QueueClosed,
            })
    }
}

impl<NS: NotificationSender> NotificationWorker<NS> {
    /// Deliver notifications until every queue handle has been dropped.
    ///
    /// Failed deliveries are logged as dead letters and not retried.
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(notification) = self.receiver.recv().await {
            match self.sender.send(&notification).await {
                Ok(()) => tracing::info!(
                    notification_id = %notification.id,
                    subject = %notification.subject,
                    "Notification delivered"
                ),
                Err(e) => tracing::error!(
                    target: "notifications::dead_letter",
                    notification_id = %notification.id,
                    recipient = %notification.recipient,
                    subject = %notification.subject,
                    error = %e,
                    "Notification delivery failed"
                ),
            }
        }

        tracing::info!("Notification worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct RecordingSender {
        delivered: Mutex<Vec<String>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
            if self.fail_for.as_deref() == Some(notification.recipient.as_str()) {
                return Err(NotificationError::DeliveryFailed("smtp down".to_string()));
            }
            self.delivered
                .lock()
                .unwrap()
                .push(notification.recipient.clone());
            Ok(())
        }
    }

    fn notification(recipient: &str) -> Notification {
        Notification::new(recipient.to_string(), "Hi".to_string(), "Body".to_string())
    }

    #[tokio::test]
    async fn test_worker_delivers_in_order_and_survives_failures() {
        let sender = Arc::new(RecordingSender {
            fail_for: Some("broken@example.com".to_string()),
            ..Default::default()
        });
        let (queue, worker) = ChannelNotificationQueue::new(10, Arc::clone(&sender));

        queue.enqueue(notification("a@example.com")).unwrap();
        queue.enqueue(notification("broken@example.com")).unwrap();
        queue.enqueue(notification("b@example.com")).unwrap();
        drop(queue);

        worker.run().await;

        assert_eq!(
            *sender.delivered.lock().unwrap(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_enqueue_reports_full_queue() {
        let (queue, _worker) =
            ChannelNotificationQueue::new(1, Arc::new(RecordingSender::default()));

        queue.enqueue(notification("a@example.com")).unwrap();
        assert!(matches!(
            queue.enqueue(notification("b@example.com")),
            Err(NotificationError::QueueFull)
        ));
    }

    #[tokio::test]
    async fn test_enqueue_reports_closed_queue() {
        let (queue, worker) =
            ChannelNotificationQueue::new(1, Arc::new(RecordingSender::default()));
        drop(worker);

        assert!(matches!(
            queue.enqueue(notification("a@example.com")),
            Err(NotificationError::QueueClosed)
        ));
    }
}
