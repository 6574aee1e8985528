//! Outbound delivery of gossip payloads
//!
//! The gossip engine only needs "send this snapshot to that peer". The HTTP
//! implementation posts JSON to the peer's `/gossip` endpoint.
use async_trait::async_trait;
use tracing::debug;

use super::PeerAddress;
use crate::error::Result;
use crate::store::Snapshot;
use crate::transport_error;

/// Best-effort delivery of a full snapshot to one peer
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn send(&self, peer: &PeerAddress, snapshot: &Snapshot) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct HttpPeerTransport {
    client: reqwest::Client,
}

impl HttpPeerTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PeerTransport for HttpPeerTransport {
    async fn send(&self, peer: &PeerAddress, snapshot: &Snapshot) -> Result<()> {
        let url = peer.gossip_url();
        let resp = self.client.post(&url).json(snapshot).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(transport_error!("{} answered {}", peer, status));
        }
        debug!("Delivered {} entries to {}", snapshot.len(), peer);
        Ok(())
    }
}
