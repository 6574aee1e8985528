//! Last-write-wins conflict resolution.
//!
//! Entries are ordered by `(timestamp, value)`. An incoming entry replaces the
//! local one only if it is strictly greater in that order, so the fold over any
//! set of payloads ends at the same maximum no matter how they arrive.
use std::cmp::Ordering;

use super::VersionedValue;

/// What a merge did with one incoming entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No local entry existed; the incoming one was inserted
    Inserted,
    /// The incoming entry was newer and replaced the local one
    Replaced,
    /// The local entry is newer or identical; the incoming one was dropped
    Discarded,
}

impl Resolution {
    pub fn applied(&self) -> bool {
        !matches!(self, Resolution::Discarded)
    }
}

/// Total order used for LWW. Equal timestamps fall back to the larger value.
pub fn compare(a: &VersionedValue, b: &VersionedValue) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.value.cmp(&b.value))
}

/// Decide whether `incoming` should replace `local`.
pub fn resolve(local: Option<&VersionedValue>, incoming: &VersionedValue) -> Resolution {
    match local {
        None => Resolution::Inserted,
        Some(local) if compare(incoming, local) == Ordering::Greater => Resolution::Replaced,
        Some(_) => Resolution::Discarded,
    }
}
