//! Presence registry: the authoritative record of who is online.
//!
//! One entry per connected user, keyed by [`UserId`]. A second connection
//! from the same user overwrites the first entry; the displaced handle is
//! returned to the caller but never closed here.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

use talkie_core::types::{ConnectionId, UserId};

use crate::connection::handle::ConnectionHandle;

/// Point-in-time copy of the online-user set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PresenceSnapshot(Vec<UserId>);

impl PresenceSnapshot {
    /// Online user IDs, sorted.
    pub fn users(&self) -> &[UserId] {
        &self.0
    }

    /// Whether the user was online when the snapshot was taken.
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.0.binary_search(user_id).is_ok()
    }

    /// Number of online users.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody was online.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the snapshot, returning the user IDs.
    pub fn into_users(self) -> Vec<UserId> {
        self.0
    }
}

/// Process-wide mapping of online users to their live connection.
///
/// All operations take the single lock briefly and never perform I/O
/// while holding it.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: RwLock<HashMap<UserId, Arc<ConnectionHandle>>>,
}

impl PresenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `user_id`.
    ///
    /// Returns the handle that was displaced, if any.
    pub fn register(
        &self,
        user_id: UserId,
        handle: Arc<ConnectionHandle>,
    ) -> Option<Arc<ConnectionHandle>> {
        let displaced = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.clone(), handle);

        if let Some(ref old) = displaced {
            debug!(user_id = %user_id, old_conn = %old.id, "Presence entry overwritten");
        }
        displaced
    }

    /// Remove the entry for `user_id` regardless of which connection owns it.
    pub fn unregister(&self, user_id: &UserId) -> Option<Arc<ConnectionHandle>> {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id);

        if removed.is_none() {
            debug!(user_id = %user_id, "Unregister for user not in registry");
        }
        removed
    }

    /// Remove the entry for `user_id` only if it still belongs to `conn_id`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn release(&self, user_id: &UserId, conn_id: ConnectionId) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(user_id) {
            Some(current) if current.id == conn_id => {
                entries.remove(user_id);
                true
            }
            Some(current) => {
                debug!(
                    user_id = %user_id,
                    closed_conn = %conn_id,
                    current_conn = %current.id,
                    "Stale connection closed, newer entry kept"
                );
                false
            }
            None => {
                debug!(user_id = %user_id, "Release for user not in registry");
                false
            }
        }
    }

    /// Current set of online users.
    pub fn snapshot(&self) -> PresenceSnapshot {
        let mut users: Vec<UserId> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        users.sort();
        PresenceSnapshot(users)
    }

    /// The live connection of a user.
    pub fn get(&self, user_id: &UserId) -> Option<Arc<ConnectionHandle>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    /// Whether the user currently has an entry.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(user_id)
    }

    /// Number of online users.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nobody is online.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
