//! Anti-entropy gossip between nodes
//!
//! Every round the engine picks one peer uniformly at random and pushes a
//! full copy of the local store to it. The receiving node folds the payload
//! in with last-write-wins, so rounds can arrive in any order, be repeated or
//! be lost without breaking convergence.
pub mod engine;
pub mod peers;
pub mod stats;
pub mod transport;

pub use engine::{GossipEngine, TickOutcome};
pub use peers::{PeerAddress, PeerSet};
pub use stats::{DeliveryOutcome, GossipStats, GossipStatsReport};
pub use transport::{HttpPeerTransport, PeerTransport};
