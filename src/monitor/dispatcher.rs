//! Debounced alert dispatch
//!
//! The LastAlertSent record gates delivery: an alert goes out only when the
//! previous allowed dispatch is older than the debounce window. The record is
//! reset before delivery is attempted, so a failed or unconfigured send still
//! starts a new cooldown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::{seconds_between, DispatchOutcome};
use crate::liveness::Clock;
use crate::notify::{Notifier, NotifyError};
use crate::storage::TimestampRecord;

/// Sends alerts through a [`Notifier`], at most once per debounce window.
#[derive(Clone)]
pub struct AlertDispatcher {
    record: Arc<dyn TimestampRecord>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    debounce: Duration,
}

impl AlertDispatcher {
    pub fn new(
        record: Arc<dyn TimestampRecord>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        debounce: Duration,
    ) -> Self {
        Self {
            record,
            notifier,
            clock,
            debounce,
        }
    }

    /// Decide whether an alert may go out at `now`.
    ///
    /// - No record: create one stamped `now` and allow.
    /// - Unreadable or corrupt record: suppress.
    /// - Otherwise allow once the debounce window has fully elapsed.
    pub fn must_send_alert(&self, now: DateTime<Utc>) -> bool {
        match self.record.load() {
            Ok(None) => {
                if let Err(e) = self.record.store(now) {
                    error!("Failed to create last alert record: {}", e);
                }
                true
            }
            Ok(Some(last_alert)) => {
                seconds_between(now, last_alert) > self.debounce.as_secs_f64()
            }
            Err(e) => {
                error!("Failed to read last alert record: {}", e);
                false
            }
        }
    }

    /// Dispatch one alert message, subject to debounce.
    pub async fn dispatch(&self, message: &str) -> DispatchOutcome {
        let now = self.clock.now();
        if !self.must_send_alert(now) {
            info!(
                debounce_secs = self.debounce.as_secs(),
                "Alert suppressed, debounce window still open"
            );
            return DispatchOutcome::Suppressed;
        }

        if let Err(e) = self.record.store(now) {
            error!("Failed to persist last alert time: {}", e);
        }

        match self.notifier.send(message).await {
            Ok(()) => {
                info!(channel = self.notifier.name(), "Alert sent: {}", message);
                DispatchOutcome::Sent
            }
            Err(NotifyError::NotConfigured) => {
                error!(
                    channel = self.notifier.name(),
                    "Cannot send alert, notifier credentials are not configured"
                );
                DispatchOutcome::NotConfigured
            }
            Err(e) => {
                error!(channel = self.notifier.name(), "Failed to send alert: {}", e);
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liveness::ManualClock;
    use crate::storage::InMemoryRecord;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Notifier double that counts calls and replays a fixed result.
    struct CountingNotifier {
        calls: AtomicUsize,
        fail_with_status: Option<reqwest::StatusCode>,
        configured: bool,
    }

    impl CountingNotifier {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with_status: None,
                configured: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        fn name(&self) -> &str {
            "counting"
        }

        async fn send(&self, _text: &str) -> Result<(), NotifyError> {
            if !self.configured {
                return Err(NotifyError::NotConfigured);
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with_status {
                Some(status) => Err(NotifyError::Status(status)),
                None => Ok(()),
            }
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn dispatcher(
        record: Arc<InMemoryRecord>,
        notifier: Arc<CountingNotifier>,
        clock: &ManualClock,
    ) -> AlertDispatcher {
        AlertDispatcher::new(
            record,
            notifier,
            Arc::new(clock.clone()),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_absent_record_is_created_and_allows() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        let d = dispatcher(record.clone(), Arc::new(CountingNotifier::ok()), &clock);

        assert!(d.must_send_alert(t0()));
        assert_eq!(record.load().unwrap(), Some(t0()));
    }

    #[test]
    fn test_corrupt_record_fails_closed() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        record.set_raw("garbage");
        let d = dispatcher(record.clone(), Arc::new(CountingNotifier::ok()), &clock);

        assert!(!d.must_send_alert(t0()));
        // Left untouched
        assert_eq!(record.raw().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_window_is_strict() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        record.store(t0()).unwrap();
        let d = dispatcher(record, Arc::new(CountingNotifier::ok()), &clock);

        assert!(!d.must_send_alert(t0() + chrono::Duration::seconds(59)));
        assert!(!d.must_send_alert(t0() + chrono::Duration::seconds(60)));
        assert!(d.must_send_alert(t0() + chrono::Duration::seconds(61)));
    }

    #[tokio::test]
    async fn test_second_dispatch_within_window_suppressed() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        let notifier = Arc::new(CountingNotifier::ok());
        let d = dispatcher(record.clone(), notifier.clone(), &clock);

        assert_eq!(d.dispatch("down").await, DispatchOutcome::Sent);
        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(d.dispatch("down").await, DispatchOutcome::Suppressed);

        assert_eq!(notifier.calls(), 1);
        assert_eq!(record.load().unwrap(), Some(t0()));

        clock.advance(chrono::Duration::seconds(31));
        assert_eq!(d.dispatch("down").await, DispatchOutcome::Sent);
        assert_eq!(notifier.calls(), 2);
        assert_eq!(record.load().unwrap(), Some(t0() + chrono::Duration::seconds(61)));
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_debounce_reset() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        record.store(t0() - chrono::Duration::hours(1)).unwrap();
        let notifier = Arc::new(CountingNotifier {
            fail_with_status: Some(reqwest::StatusCode::BAD_GATEWAY),
            ..CountingNotifier::ok()
        });
        let d = dispatcher(record.clone(), notifier.clone(), &clock);

        let outcome = d.dispatch("down").await;
        assert!(matches!(outcome, DispatchOutcome::Failed(ref r) if r.contains("502")));
        assert_eq!(record.load().unwrap(), Some(t0()));

        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(d.dispatch("down").await, DispatchOutcome::Suppressed);
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_still_resets_debounce() {
        let clock = ManualClock::new(t0());
        let record = Arc::new(InMemoryRecord::new("alert"));
        let notifier = Arc::new(CountingNotifier {
            configured: false,
            ..CountingNotifier::ok()
        });
        let d = dispatcher(record.clone(), notifier, &clock);

        assert_eq!(d.dispatch("down").await, DispatchOutcome::NotConfigured);
        assert_eq!(record.load().unwrap(), Some(t0()));
    }
}
