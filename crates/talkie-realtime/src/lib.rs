//! # talkie-realtime
//!
//! Real-time engine for Talkie. Provides:
//!
//! - the presence registry (`userId` → live connection, last connection wins)
//! - WebSocket connection handles and the pool of every open socket
//! - the ping/pong heartbeat that drops unresponsive peers
//! - connect-time identity verification
//! - the gateway that keeps every client's online-user view consistent

pub mod connection;
pub mod gateway;
pub mod message;
pub mod metrics;
pub mod presence;

pub use connection::{
    ConnectAuthenticator, ConnectionHandle, ConnectionPool, HeartbeatConfig, run_heartbeat,
};
pub use gateway::RealtimeGateway;
pub use message::OutboundMessage;
pub use metrics::{MetricsSnapshot, RealtimeMetrics};
pub use presence::{PresenceRegistry, PresenceSnapshot};
