//! Telegram Bot API notifier
//!
//! Sends `GET {api_base}/bot<TOKEN>/sendMessage?chat_id=<ID>&text=<message>`
//! with a short fixed timeout. Any 2xx status counts as delivered.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{Notifier, NotifyError};
use crate::config::{defaults, TelegramConfig};

/// HTTP client for the Telegram Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    /// Build a notifier with the default request timeout.
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        Self::with_timeout(
            config,
            Duration::from_secs(defaults::NOTIFY_HTTP_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(config: &TelegramConfig, timeout: Duration) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }

    fn send_message_url(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (self.token.as_deref(), self.chat_id.as_deref()) else {
            return Err(NotifyError::NotConfigured);
        };

        let resp = self
            .http
            .get(self.send_message_url(token))
            .query(&[("chat_id", chat_id), ("text", text)])
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            debug!(status = %status, "Telegram accepted message");
            Ok(())
        } else {
            Err(NotifyError::Status(status))
        }
    }
}
