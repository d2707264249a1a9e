//! Outbound WebSocket message definitions.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Event names are a wire contract shared with clients.

use serde::{Deserialize, Serialize};

use talkie_core::types::UserId;

/// Event name of the presence broadcast.
pub const ONLINE_USERS_EVENT: &str = "getOnlineUsers";

/// Messages sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundMessage {
    /// Full set of currently online users, in no particular order.
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers(Vec<UserId>),
    /// Error report for this connection.
    #[serde(rename = "error")]
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        message: String,
    },
    /// Keepalive ping; written as a WebSocket control frame, never as JSON.
    #[serde(skip)]
    Ping,
}

impl OutboundMessage {
    /// Serializes the message into a text frame payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the wire event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::OnlineUsers(_) => ONLINE_USERS_EVENT,
            Self::Error { .. } => "error",
            Self::Ping => "ping",
        }
    }
}
