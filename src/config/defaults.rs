//! System-wide default constants.
//!
//! Centralises the fixed values the watchdog does not read from the
//! environment. Grouped by subsystem for easy discovery.

// ============================================================================
// HTTP Server
// ============================================================================

/// Bind host used when neither `--host` nor `BIND_HOST` is given.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

// ============================================================================
// Alert Transport
// ============================================================================

/// Telegram Bot API root. Overridable with `TELEGRAM_API_BASE`.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Timeout for a single outbound notification request (seconds).
pub const NOTIFY_HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Staleness Monitor
// ============================================================================

/// Smallest accepted `PING_INTERVAL` (seconds).
///
/// A zero interval would turn the monitor into a busy loop.
pub const MIN_PING_INTERVAL_SECS: u64 = 1;
