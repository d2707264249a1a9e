//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};

use super::handle::ConnectionHandle;
use crate::message::types::OutboundMessage;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Silence after which the connection is considered dead; `None` never expires
    pub pong_timeout: Option<Duration>,
}

impl HeartbeatConfig {
    /// Builds the heartbeat settings from whole seconds.
    ///
    /// Returns `None` when pings are disabled. A pong timeout shorter than
    /// one ping interval is raised to it.
    pub fn from_secs(ping_interval_seconds: u64, pong_timeout_seconds: u64) -> Option<Self> {
        if ping_interval_seconds == 0 {
            return None;
        }
        let ping_interval = Duration::from_secs(ping_interval_seconds);
        let pong_timeout = match pong_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs).max(ping_interval)),
        };
        Some(Self {
            ping_interval,
            pong_timeout,
        })
    }
}

/// Run heartbeat loop for a connection.
///
/// Queues a ping every interval and marks the connection closed once the
/// peer has not answered for longer than the pong timeout. Returns when
/// the connection is closed, by this loop or anything else.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval_at(Instant::now() + config.ping_interval, config.ping_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = handle.closed() => break,
        }

        if let Some(timeout) = config.pong_timeout {
            let silent = handle.since_last_pong();
            if silent >= timeout {
                tracing::warn!(
                    conn_id = %handle.id,
                    silent_ms = silent.as_millis() as u64,
                    "Connection heartbeat timeout"
                );
                handle.mark_closed();
                break;
            }
        }

        // A full queue skips this ping; the pong timeout still applies.
        if !handle.send(OutboundMessage::Ping) && !handle.is_alive() {
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
