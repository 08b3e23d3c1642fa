//! Outbound alert delivery
//!
//! The monitor only knows the `Notifier` trait; the Telegram Bot API is the
//! production implementation.

pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

/// Notification transport errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notifier credentials are not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A channel that can deliver a plain-text alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging
    fn name(&self) -> &str;

    /// Deliver one message. No retries.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
