use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Network endpoint of another node, usually `host:port`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct PeerAddress(String);

impl PeerAddress {
    pub fn new(addr: String) -> Self {
        Self(addr)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Inbound gossip endpoint on this peer
    pub fn gossip_url(&self) -> String {
        let base = self.0.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{}/gossip", base)
        } else {
            format!("http://{}/gossip", base)
        }
    }
}

impl From<&str> for PeerAddress {
    fn from(addr: &str) -> Self {
        PeerAddress::new(addr.to_string())
    }
}

impl From<String> for PeerAddress {
    fn from(addr: String) -> Self {
        PeerAddress::new(addr)
    }
}

impl std::fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed list of peers, never including this node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeerSet {
    peers: Vec<PeerAddress>,
}

impl PeerSet {
    /// Blank entries, duplicates and `self_address` are dropped.
    pub fn new<'a>(addrs: impl IntoIterator<Item = &'a str>, self_address: &str) -> Self {
        let mut peers: Vec<PeerAddress> = Vec::new();
        for addr in addrs {
            let addr = addr.trim();
            if addr.is_empty() {
                continue;
            }
            if addr == self_address {
                warn!("Dropping own address {} from peer list", addr);
                continue;
            }
            let peer = PeerAddress::from(addr);
            if !peers.contains(&peer) {
                peers.push(peer);
            }
        }
        Self { peers }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, addr: &str) -> bool {
        self.peers.iter().any(|p| p.as_str() == addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerAddress> {
        self.peers.iter()
    }

    /// Uniformly random peer, or `None` when there are no peers.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&PeerAddress> {
        self.peers.choose(rng)
    }
}
