//! Peer-to-peer score synchronization.
//!
//! Each node keeps player scores in a [`store::StateStore`], accepts local
//! writes over HTTP, and periodically pushes its whole state to one random
//! peer through the [`gossip::GossipEngine`]. Conflicts are settled with
//! last-write-wins on the write timestamp.
pub mod api;
pub mod cli;
pub mod error;
pub mod gossip;
pub mod node;
pub mod settings;
pub mod store;
