//! Watchdog assembly
//!
//! Wires the durable records, the shared `LastSeen` cell, the heartbeat
//! receiver, and the staleness monitor from a [`WatchdogConfig`]. `main`
//! spawns the pieces; tests build them the same way with a manual clock and
//! a stub notifier.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::api::{create_app, ApiState};
use crate::config::WatchdogConfig;
use crate::liveness::{recover_last_seen, Clock, HeartbeatReceiver, LastSeen};
use crate::monitor::{AlertDispatcher, MonitorSettings, StalenessMonitor};
use crate::notify::Notifier;
use crate::storage::{FileRecord, TimestampRecord};

/// Ready-to-run watchdog components
pub struct WatchdogService {
    /// HTTP router serving `POST /ping`
    pub app: Router,
    /// Staleness monitor, not yet running
    pub monitor: StalenessMonitor,
    /// Shared last-seen handle
    pub last_seen: LastSeen,
}

impl WatchdogService {
    /// Build all components and recover LastSeen from its durable record.
    pub async fn init(
        config: &WatchdogConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let ping_record: Arc<dyn TimestampRecord> =
            Arc::new(FileRecord::new(&config.last_ping_file));
        let alert_record: Arc<dyn TimestampRecord> =
            Arc::new(FileRecord::new(&config.last_alert_file));

        let last_seen = LastSeen::new();
        recover_last_seen(ping_record.as_ref(), &last_seen).await;

        let settings = MonitorSettings::from_config(config);
        info!(
            window = %config.debounce_window,
            debounce_secs = settings.debounce.as_secs(),
            "Alert debounce configured"
        );

        let dispatcher = AlertDispatcher::new(
            alert_record,
            notifier,
            Arc::clone(&clock),
            settings.debounce,
        );
        let monitor =
            StalenessMonitor::new(last_seen.clone(), dispatcher, Arc::clone(&clock), settings);

        let receiver = HeartbeatReceiver::new(last_seen.clone(), ping_record, clock);
        let app = create_app(ApiState::new(receiver));

        Self {
            app,
            monitor,
            last_seen,
        }
    }
}
