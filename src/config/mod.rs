//! Watchdog Configuration Module
//!
//! All runtime settings come from environment variables (optionally seeded
//! from a `.env` file by `main`).
//!
//! ## Usage
//!
//! ```ignore
//! let config = config::WatchdogConfig::from_env()?;
//! let timeout = config.ping_timeout();
//! ```

mod watchdog_config;
pub mod defaults;

pub use watchdog_config::*;
