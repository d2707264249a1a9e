//! Gateway metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Gateway-level counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections accepted
    pub connections_total: AtomicU64,
    /// Connections refused at connect time
    pub connections_rejected: AtomicU64,
    /// Presence broadcasts performed
    pub broadcasts: AtomicU64,
    /// Frames enqueued to connections
    pub messages_sent: AtomicU64,
    /// Frames dropped because a queue was full or closed
    pub messages_dropped: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        if n > 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Total connections accepted
    pub connections_total: u64,
    /// Connections refused at connect time
    pub connections_rejected: u64,
    /// Presence broadcasts performed
    pub broadcasts: u64,
    /// Frames enqueued to connections
    pub messages_sent: u64,
    /// Frames dropped because a queue was full or closed
    pub messages_dropped: u64,
}
