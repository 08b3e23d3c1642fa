//! Staleness Monitor: periodic heartbeat age check
//!
//! Sleeps `PING_INTERVAL`, evaluates, repeats. Ticks are sleep-based, not
//! aligned to the wall clock, so a slow alert delivery pushes the next tick
//! back by the same amount.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::{seconds_between, AlertDispatcher, MonitorSettings, TickOutcome};
use crate::liveness::{Clock, LastSeen};

/// Alert text for a heartbeat that is `elapsed_secs` old.
pub fn alert_message(elapsed_secs: f64) -> String {
    format!("ALERT: no ping received in {:.0} seconds.", elapsed_secs)
}

/// Background checker raising alerts when heartbeats stop
pub struct StalenessMonitor {
    last_seen: LastSeen,
    dispatcher: AlertDispatcher,
    clock: Arc<dyn Clock>,
    settings: MonitorSettings,
}

impl StalenessMonitor {
    pub fn new(
        last_seen: LastSeen,
        dispatcher: AlertDispatcher,
        clock: Arc<dyn Clock>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            last_seen,
            dispatcher,
            clock,
            settings,
        }
    }

    /// Run the check loop until `cancel` fires (call from tokio::spawn).
    ///
    /// Returns the number of completed ticks.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        info!(
            interval_secs = self.settings.interval.as_secs(),
            timeout_secs = self.settings.ping_timeout.as_secs(),
            debounce_secs = self.settings.debounce.as_secs(),
            "Staleness monitor started"
        );

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("[StalenessMonitor] Received shutdown signal after {} ticks", ticks);
                    break;
                }
                () = tokio::time::sleep(self.settings.interval) => {}
            }

            self.tick().await;
            ticks += 1;
        }
        ticks
    }

    /// Evaluate heartbeat age once and alert if it is stale.
    pub async fn tick(&self) -> TickOutcome {
        let now = self.clock.now();

        let Some(last) = self.last_seen.get().await else {
            warn!("No ping received yet");
            return TickOutcome::NoHeartbeat;
        };

        let elapsed_secs = seconds_between(now, last);
        if elapsed_secs > self.settings.ping_timeout.as_secs_f64() {
            let message = alert_message(elapsed_secs);
            error!("{}", message);
            let dispatch = self.dispatcher.dispatch(&message).await;
            TickOutcome::Stale {
                elapsed_secs,
                dispatch,
            }
        } else {
            info!("Ping updated {:.0} seconds ago", elapsed_secs);
            TickOutcome::Fresh { elapsed_secs }
        }
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }
}
