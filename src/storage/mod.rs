//! Durable watchdog state
//!
//! Two single-value records survive restarts: the last accepted heartbeat
//! (LastSeen) and the last allowed alert dispatch (LastAlertSent). Neither is
//! locked or written atomically; a crash mid-write can at worst corrupt a
//! record, which callers treat as absent or as a reason to suppress.

pub mod record;

pub use record::{
    format_timestamp, parse_timestamp, FileRecord, InMemoryRecord, RecordError, TimestampRecord,
};
