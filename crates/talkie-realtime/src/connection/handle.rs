//! Individual WebSocket connection handle.

use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;

use talkie_core::types::{ConnectionId, UserId};

use crate::message::types::OutboundMessage;

/// A handle to a single WebSocket connection.
///
/// Holds the sender side of the connection's outbound queue plus the
/// identity recorded at connect time.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User recorded at connect time; `None` for anonymous connections
    pub user_id: Option<UserId>,
    /// Sender for outbound messages
    sender: mpsc::Sender<OutboundMessage>,
    /// Last time the peer answered a ping
    last_pong: Mutex<Instant>,
    /// Whether the connection is still open
    alive: AtomicBool,
    /// Wakes every task driving this connection once it is closed
    close_signal: Notify,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(user_id: Option<UserId>, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            sender,
            last_pong: Mutex::new(Instant::now()),
            alive: AtomicBool::new(true),
            close_signal: Notify::new(),
        }
    }

    /// Queue a message for this connection without waiting.
    ///
    /// Returns `false` if the connection is closed or its queue is full.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(msg)) => {
                tracing::warn!(
                    conn_id = %self.id,
                    event = msg.event_name(),
                    "Connection send buffer full, dropping message"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Records a pong from the peer.
    pub fn record_pong(&self) {
        *self.last_pong.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since the peer last answered a ping, or since connect.
    pub fn since_last_pong(&self) -> Duration {
        self.last_pong
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as closed and wake everything waiting on [`closed`](Self::closed).
    pub fn mark_closed(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.close_signal.notify_waiters();
        }
    }

    /// Resolves once the connection has been marked closed.
    ///
    /// Any number of tasks may wait at once.
    pub async fn closed(&self) {
        let notified = self.close_signal.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent close is not missed.
        notified.as_mut().enable();
        if !self.is_alive() {
            return;
        }
        notified.await;
    }
}
