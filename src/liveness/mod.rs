//! Liveness tracking: last-seen state and heartbeat receipt
//!
//! `LastSeen` is the only in-process liveness state. It is written by the
//! heartbeat receiver and read by the staleness monitor; both hold a clone of
//! the same handle.

pub mod clock;
pub mod receiver;

pub use clock::{Clock, ManualClock, SystemClock};
pub use receiver::HeartbeatReceiver;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::storage::{format_timestamp, TimestampRecord};

/// Shared handle to the most recent accepted heartbeat.
///
/// `None` means no heartbeat has been received (or recovered) yet.
#[derive(Debug, Clone, Default)]
pub struct LastSeen {
    inner: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl LastSeen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(at: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(at))),
        }
    }

    /// Copy of the current value.
    pub async fn get(&self) -> Option<DateTime<Utc>> {
        *self.inner.read().await
    }

    pub async fn set(&self, at: DateTime<Utc>) {
        *self.inner.write().await = Some(at);
    }
}

/// Seed `last_seen` from its durable record at startup.
///
/// Returns the recovered value. A missing record is normal on first run; an
/// unreadable or corrupt one is logged and treated the same way.
pub async fn recover_last_seen(
    record: &dyn TimestampRecord,
    last_seen: &LastSeen,
) -> Option<DateTime<Utc>> {
    match record.load() {
        Ok(Some(at)) => {
            last_seen.set(at).await;
            info!(
                path = %record.describe(),
                "Last ping recovered: {}",
                format_timestamp(at)
            );
            Some(at)
        }
        Ok(None) => {
            info!(path = %record.describe(), "No previous ping on record");
            None
        }
        Err(e) => {
            error!("Failed to recover last ping: {}", e);
            None
        }
    }
}
