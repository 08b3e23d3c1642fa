//! Watchdog configuration loaded from the process environment.
//!
//! Every required value is checked at startup; a missing or malformed value
//! is a fatal error so the process never runs with a half-built config.
//! Telegram credentials are the exception: without them the watchdog still
//! starts and simply cannot deliver alerts.

use std::path::PathBuf;
use std::time::Duration;

use tracing::error;

use super::defaults;

// ============================================================================
// Environment Keys
// ============================================================================

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_TELEGRAM_API_BASE: &str = "TELEGRAM_API_BASE";
pub const ENV_LAST_PING_FILE: &str = "LAST_PING_FILE";
pub const ENV_LAST_ALERT_FILE: &str = "LAST_ALERT_FILE";
pub const ENV_PING_TIMEOUT: &str = "PING_TIMEOUT";
pub const ENV_PING_INTERVAL: &str = "PING_INTERVAL";
pub const ENV_ALERT_TIMEOUT: &str = "ALERT_TIMEOUT";
pub const ENV_ALERT_DEBOUNCE_WINDOW: &str = "ALERT_DEBOUNCE_WINDOW";

// ============================================================================
// Debounce Window
// ============================================================================

/// Which configured timeout gates repeated alerts.
///
/// Deployments have always debounced on `PING_TIMEOUT`, so that stays the
/// default. `AlertTimeout` switches the cooldown to `ALERT_TIMEOUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceWindow {
    #[default]
    PingTimeout,
    AlertTimeout,
}

impl std::str::FromStr for DebounceWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ping_timeout" | "ping" => Ok(Self::PingTimeout),
            "alert_timeout" | "alert" => Ok(Self::AlertTimeout),
            other => Err(format!(
                "expected 'ping_timeout' or 'alert_timeout', got '{other}'"
            )),
        }
    }
}

impl std::fmt::Display for DebounceWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PingTimeout => write!(f, "ping_timeout"),
            Self::AlertTimeout => write!(f, "alert_timeout"),
        }
    }
}

// ============================================================================
// Telegram Credentials
// ============================================================================

/// Bot credentials. Both halves must be present for alerts to be delivered.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

// The token is a secret; keep it out of debug output and startup banners.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

// ============================================================================
// Watchdog Config
// ============================================================================

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Durable LastSeen record
    pub last_ping_file: PathBuf,
    /// Durable LastAlertSent record
    pub last_alert_file: PathBuf,
    /// Staleness threshold (seconds)
    pub ping_timeout_secs: u64,
    /// Monitor period (seconds)
    pub ping_interval_secs: u64,
    /// Alternative debounce window (seconds)
    pub alert_timeout_secs: u64,
    pub debounce_window: DebounceWindow,
    pub telegram: TelegramConfig,
}

impl WatchdogConfig {
    /// Load from the real process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let seconds = |key: &'static str| -> Result<u64, ConfigError> {
            let raw = required(key)?;
            raw.parse::<u64>()
                .map_err(|_| ConfigError::NotAnInteger { key, value: raw })
        };

        let telegram = TelegramConfig {
            token: get(ENV_TELEGRAM_TOKEN),
            chat_id: get(ENV_TELEGRAM_CHAT_ID),
            api_base: get(ENV_TELEGRAM_API_BASE)
                .unwrap_or_else(|| defaults::TELEGRAM_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        };
        if !telegram.is_configured() {
            error!(
                "{} or {} is not set; alerts will be logged but not delivered",
                ENV_TELEGRAM_TOKEN, ENV_TELEGRAM_CHAT_ID
            );
        }

        let debounce_window = match get(ENV_ALERT_DEBOUNCE_WINDOW) {
            None => DebounceWindow::default(),
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_ALERT_DEBOUNCE_WINDOW,
                reason,
            })?,
        };

        let config = Self {
            last_ping_file: PathBuf::from(required(ENV_LAST_PING_FILE)?),
            last_alert_file: PathBuf::from(required(ENV_LAST_ALERT_FILE)?),
            ping_timeout_secs: seconds(ENV_PING_TIMEOUT)?,
            ping_interval_secs: seconds(ENV_PING_INTERVAL)?,
            alert_timeout_secs: seconds(ENV_ALERT_TIMEOUT)?,
            debounce_window,
            telegram,
        };
        config.validate()?;
        Ok(config)
    }

    /// Range checks that parsing alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ping_interval_secs < defaults::MIN_PING_INTERVAL_SECS {
            return Err(ConfigError::Invalid {
                key: ENV_PING_INTERVAL,
                reason: format!(
                    "must be at least {} second(s)",
                    defaults::MIN_PING_INTERVAL_SECS
                ),
            });
        }
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }

    /// Cooldown applied between two allowed alert dispatches.
    pub fn debounce(&self) -> Duration {
        match self.debounce_window {
            DebounceWindow::PingTimeout => Duration::from_secs(self.ping_timeout_secs),
            DebounceWindow::AlertTimeout => Duration::from_secs(self.alert_timeout_secs),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {key} must be an integer number of seconds (got '{value}')")]
    NotAnInteger { key: &'static str, value: String },
    #[error("environment variable {key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
