//! Heartbeat receiver
//!
//! Records receipt time for every inbound ping. Persistence is best-effort:
//! a failed write is logged and the ping is still accepted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::{Clock, LastSeen};
use crate::storage::{format_timestamp, TimestampRecord};
use crate::types::PingPayload;

/// Sole writer of [`LastSeen`].
#[derive(Clone)]
pub struct HeartbeatReceiver {
    last_seen: LastSeen,
    record: Arc<dyn TimestampRecord>,
    clock: Arc<dyn Clock>,
}

impl HeartbeatReceiver {
    pub fn new(
        last_seen: LastSeen,
        record: Arc<dyn TimestampRecord>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            last_seen,
            record,
            clock,
        }
    }

    /// Accept a heartbeat and return the recorded receipt time.
    ///
    /// Never fails from the caller's point of view.
    pub async fn record(&self, payload: &PingPayload) -> DateTime<Utc> {
        let now = self.clock.now();
        self.last_seen.set(now).await;

        if let Err(e) = self.record.store(now) {
            error!("Failed to persist last ping: {}", e);
        }

        info!(
            cameras = payload.cameras.len(),
            "Ping received at {}",
            format_timestamp(now)
        );
        debug!(payload = ?payload.cameras, "Ping payload");
        now
    }

    pub fn last_seen(&self) -> &LastSeen {
        &self.last_seen
    }
}
