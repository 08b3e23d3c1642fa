//! Shared data structures for the heartbeat wire format

mod ping;

pub use ping::*;
