//! Real-time gateway configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Require a session token proving the `userId` supplied at connect time.
    #[serde(default = "default_true")]
    pub verify_identity: bool,
    /// Per-connection outbound queue capacity.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// WebSocket ping interval in seconds (0 disables pings).
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Seconds without a pong before a connection is dropped (0 never drops).
    ///
    /// Values shorter than the ping interval are raised to it.
    #[serde(default = "default_pong_timeout")]
    pub pong_timeout_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            verify_identity: true,
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            pong_timeout_seconds: default_pong_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_channel_buffer() -> usize {
    64
}

fn default_ping_interval() -> u64 {
    30
}

fn default_pong_timeout() -> u64 {
    60
}
