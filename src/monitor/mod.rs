//! Staleness monitoring and debounced alerting
//!
//! Runs as a background tokio task that compares the time since the last
//! heartbeat against `PING_TIMEOUT` every `PING_INTERVAL` and dispatches an
//! alert when it is exceeded:
//!
//! ```text
//! WAITING_TICK -> EVALUATING -> { ALERTING | IDLE } -> WAITING_TICK
//! ```
//!
//! The loop only exits when its `CancellationToken` is cancelled.

pub mod dispatcher;
pub mod staleness;

pub use dispatcher::AlertDispatcher;
pub use staleness::StalenessMonitor;

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::WatchdogConfig;

/// Timing knobs for the monitor loop and the alert debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Sleep between two ticks
    pub interval: Duration,
    /// Elapsed time after which a heartbeat counts as stale
    pub ping_timeout: Duration,
    /// Minimum time between two allowed alert dispatches
    pub debounce: Duration,
}

impl MonitorSettings {
    pub fn from_config(config: &WatchdogConfig) -> Self {
        Self {
            interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
            debounce: config.debounce(),
        }
    }
}

/// Result of an alert dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Debounce window still open, or the debounce record is unreadable
    Suppressed,
    /// Notifier accepted the message
    Sent,
    /// Debounce reset but no credentials to deliver with
    NotConfigured,
    /// Debounce reset but delivery failed
    Failed(String),
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Suppressed => write!(f, "suppressed"),
            DispatchOutcome::Sent => write!(f, "sent"),
            DispatchOutcome::NotConfigured => write!(f, "not configured"),
            DispatchOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of one monitor tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No heartbeat received or recovered yet
    NoHeartbeat,
    /// Last heartbeat is within the timeout
    Fresh { elapsed_secs: f64 },
    /// Last heartbeat is older than the timeout
    Stale {
        elapsed_secs: f64,
        dispatch: DispatchOutcome,
    },
}

impl TickOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, TickOutcome::Stale { .. })
    }
}

impl std::fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickOutcome::NoHeartbeat => write!(f, "NO_HEARTBEAT"),
            TickOutcome::Fresh { elapsed_secs } => write!(f, "FRESH ({:.0}s)", elapsed_secs),
            TickOutcome::Stale {
                elapsed_secs,
                dispatch,
            } => write!(f, "STALE ({:.0}s, alert {})", elapsed_secs, dispatch),
        }
    }
}

/// Fractional seconds from `earlier` to `later`; negative if out of order.
pub(crate) fn seconds_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    delta
        .num_microseconds()
        .map_or_else(|| delta.num_seconds() as f64, |us| us as f64 / 1_000_000.0)
}
