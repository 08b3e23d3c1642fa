//! ping-watchdog: heartbeat liveness watchdog
//!
//! Tracks the most recent heartbeat from a camera reporter and raises a
//! debounced Telegram alert when heartbeats stop.
//!
//! ## Architecture
//!
//! - **Heartbeat Receiver** (`liveness`, `api`): `POST /ping` records receipt
//!   time in memory and in a durable record
//! - **Staleness Monitor** (`monitor`): periodic age check with debounced
//!   alert dispatch
//! - **Storage** (`storage`): single-value timestamp records
//! - **Notify** (`notify`): outbound alert transport

pub mod api;
pub mod config;
pub mod liveness;
pub mod monitor;
pub mod notify;
pub mod service;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, DebounceWindow, WatchdogConfig};

// Re-export commonly used types
pub use liveness::{Clock, HeartbeatReceiver, LastSeen, ManualClock, SystemClock};
pub use monitor::{AlertDispatcher, DispatchOutcome, StalenessMonitor, TickOutcome};
pub use notify::{Notifier, NotifyError, TelegramNotifier};
pub use service::WatchdogService;
pub use storage::{FileRecord, RecordError, TimestampRecord};
pub use types::{PingAck, PingPayload};
