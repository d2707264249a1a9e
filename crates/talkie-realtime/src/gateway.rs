//! Realtime gateway: connection lifecycle and presence broadcast.
//!
//! Every change to the presence registry is followed by a broadcast of the
//! full online-user set to every open connection. Mutation and broadcast
//! enqueue run together under one sequencer so that no client ever sees
//! an older snapshot after a newer one.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use talkie_auth::jwt::TokenVerifier;
use talkie_core::config::RealtimeConfig;
use talkie_core::result::AppResult;
use talkie_core::types::UserId;

use crate::connection::{ConnectAuthenticator, ConnectionHandle, ConnectionPool, HeartbeatConfig};
use crate::message::types::OutboundMessage;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};
use crate::presence::{PresenceRegistry, PresenceSnapshot};

/// Owns the presence registry and every open WebSocket connection.
#[derive(Debug)]
pub struct RealtimeGateway {
    /// Who is online.
    registry: Arc<PresenceRegistry>,
    /// Every open connection, anonymous ones included.
    pool: ConnectionPool,
    /// Connect-time identity check.
    authenticator: ConnectAuthenticator,
    /// Serializes registry mutation with the broadcast that follows it.
    sequencer: Mutex<()>,
    /// Counters.
    metrics: RealtimeMetrics,
    /// Configuration.
    config: RealtimeConfig,
}

impl RealtimeGateway {
    /// Creates a gateway with an empty registry.
    pub fn new(config: RealtimeConfig, verifier: Arc<dyn TokenVerifier>) -> Self {
        let authenticator = ConnectAuthenticator::new(verifier, config.verify_identity);
        Self {
            registry: Arc::new(PresenceRegistry::new()),
            pool: ConnectionPool::new(),
            authenticator,
            sequencer: Mutex::new(()),
            metrics: RealtimeMetrics::new(),
            config,
        }
    }

    /// Resolves the identity a connection attempt will be registered under.
    ///
    /// `Ok(None)` means the connection is accepted anonymously.
    pub fn authenticate(&self, claimed: Option<&str>, token: Option<&str>) -> AppResult<Option<UserId>> {
        let result = self.authenticator.authenticate(claimed, token);
        if result.is_err() {
            RealtimeMetrics::inc(&self.metrics.connections_rejected);
        }
        result
    }

    /// Accepts a connection, registers its user and broadcasts presence.
    ///
    /// Returns the handle and the receiving end of its outbound queue,
    /// which the caller drains into the socket.
    pub async fn connect(
        &self,
        user_id: Option<UserId>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));

        let step = self.sequencer.lock().await;
        self.pool.add(handle.clone());
        if let Some(ref user_id) = handle.user_id {
            self.registry.register(user_id.clone(), handle.clone());
        }
        RealtimeMetrics::inc(&self.metrics.connections_total);

        info!(
            conn_id = %handle.id,
            user_id = handle.user_id.as_ref().map(UserId::as_str).unwrap_or("-"),
            "WebSocket connection accepted"
        );

        self.broadcast_presence();
        drop(step);

        (handle, rx)
    }

    /// Removes a closed connection and broadcasts the new presence set.
    pub async fn disconnect(&self, handle: &ConnectionHandle) {
        let _step = self.sequencer.lock().await;
        handle.mark_closed();
        if self.pool.remove(&handle.id).is_none() {
            debug!(conn_id = %handle.id, "Connection already removed");
            return;
        }
        if let Some(ref user_id) = handle.user_id {
            self.registry.release(user_id, handle.id);
        }

        info!(conn_id = %handle.id, "WebSocket connection closed");

        self.broadcast_presence();
    }

    /// Sends the current snapshot to every open connection.
    ///
    /// Must be called with the sequencer held.
    fn broadcast_presence(&self) {
        let snapshot = self.registry.snapshot();
        let online = snapshot.len();
        let message = OutboundMessage::OnlineUsers(snapshot.into_users());

        let mut sent = 0u64;
        let mut dropped = 0u64;
        for conn in self.pool.all_connections() {
            if conn.send(message.clone()) {
                sent += 1;
            } else {
                dropped += 1;
            }
        }

        RealtimeMetrics::inc(&self.metrics.broadcasts);
        RealtimeMetrics::add(&self.metrics.messages_sent, sent);
        RealtimeMetrics::add(&self.metrics.messages_dropped, dropped);
        debug!(online, sent, dropped, "Presence broadcast");
    }

    /// Delivers a message to the registered connection of `user_id`.
    ///
    /// Returns `false` if the user is offline or the message was dropped.
    pub fn send_to_user(&self, user_id: &UserId, message: OutboundMessage) -> bool {
        let Some(handle) = self.registry.get(user_id) else {
            return false;
        };
        let delivered = handle.send(message);
        if delivered {
            RealtimeMetrics::inc(&self.metrics.messages_sent);
        } else {
            RealtimeMetrics::inc(&self.metrics.messages_dropped);
        }
        delivered
    }

    /// Current set of online users.
    pub fn online_users(&self) -> PresenceSnapshot {
        self.registry.snapshot()
    }

    /// Whether the user has a live connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.registry.is_online(user_id)
    }

    /// Number of open connections, anonymous ones included.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// The presence registry.
    pub fn registry(&self) -> &Arc<PresenceRegistry> {
        &self.registry
    }

    /// Gateway counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Keepalive settings for each connection, `None` when pings are disabled.
    pub fn heartbeat(&self) -> Option<HeartbeatConfig> {
        HeartbeatConfig::from_secs(
            self.config.ping_interval_seconds,
            self.config.pong_timeout_seconds,
        )
    }

    /// Closes every connection and empties the registry.
    ///
    /// Returns the number of connections closed.
    pub async fn close_all(&self) -> usize {
        let _step = self.sequencer.lock().await;
        let closed = self.pool.drain();
        for handle in &closed {
            handle.mark_closed();
            if let Some(ref user_id) = handle.user_id {
                self.registry.release(user_id, handle.id);
            }
        }
        info!(count = closed.len(), "Closed all WebSocket connections");
        closed.len()
    }
}
