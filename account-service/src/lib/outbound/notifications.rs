pub mod logging;
pub mod queue;
pub mod smtp;

pub use logging::LogNotificationSender;
pub use queue::ChannelNotificationQueue;
pub use queue::NotificationWorker;
pub use smtp::SmtpNotificationSender;
