//! Versioned player state held in memory by each node.
//!
//! Every entry carries the wall-clock time of the write that produced it.
//! Local writes always overwrite; gossip payloads go through the
//! last-write-wins resolver. All access goes through one reader/writer lock
//! that is only held while the map is traversed.
pub mod clock;
pub mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use clock::{Clock, ManualClock, SystemClock};
pub use resolver::Resolution;

pub type EntityId = String;

/// A point-in-time copy of a store. Also the gossip wire payload.
pub type Snapshot = HashMap<EntityId, VersionedValue>;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct VersionedValue {
    #[serde(rename = "score")]
    pub value: i64,
    /// Nanoseconds since the Unix epoch
    pub timestamp: i64,
}

impl VersionedValue {
    pub fn new(value: i64, timestamp: i64) -> Self {
        Self { value, timestamp }
    }
}

/// Counts from a single merge pass
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MergeReport {
    pub applied: usize,
    pub discarded: usize,
}

/// Shared handle to one node's state. Cloning shares the same map.
#[derive(Clone, Debug)]
pub struct StateStore {
    entries: Arc<RwLock<HashMap<EntityId, VersionedValue>>>,
    clock: Arc<dyn Clock>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Record a local write stamped with the current time.
    ///
    /// The existing entry is overwritten unconditionally, even if the clock
    /// now reads earlier than its timestamp.
    pub fn set(&self, id: impl Into<EntityId>, value: i64) -> VersionedValue {
        let id = id.into();
        let mut entries = self.entries.write();
        let entry = VersionedValue::new(value, self.clock.now_nanos());
        entries.insert(id, entry);
        entry
    }

    /// Independent copy of every entry
    pub fn snapshot(&self) -> Snapshot {
        self.entries.read().clone()
    }

    /// Fold a peer's payload into local state under one write lock.
    pub fn merge(&self, incoming: Snapshot) -> MergeReport {
        let mut report = MergeReport::default();
        let mut entries = self.entries.write();
        for (id, incoming_entry) in incoming {
            match resolver::resolve(entries.get(&id), &incoming_entry) {
                resolution if !resolution.applied() => {
                    report.discarded += 1;
                }
                resolution => {
                    debug!(
                        "{:?} '{}': score={} timestamp={}",
                        resolution, id, incoming_entry.value, incoming_entry.timestamp
                    );
                    entries.insert(id, incoming_entry);
                    report.applied += 1;
                }
            }
        }
        report
    }

    pub fn get(&self, id: &str) -> Option<VersionedValue> {
        self.entries.read().get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
