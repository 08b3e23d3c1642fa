use serde::{Deserialize, Serialize};

/// Inbound heartbeat body.
///
/// `cameras` maps a camera identifier to whatever the reporter sends for it.
/// The content is never evaluated; only the fact of receipt matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PingPayload {
    pub cameras: serde_json::Map<String, serde_json::Value>,
}

/// Acknowledgment returned for every accepted heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingAck {
    pub status: String,
    /// Receipt time, ISO-8601 naive UTC
    pub timestamp: String,
}

impl PingAck {
    pub fn ok(timestamp: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp,
        }
    }
}
