use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::Result;
use crate::gossip::{GossipEngine, GossipStatsReport, HttpPeerTransport, PeerTransport};
use crate::settings;
use crate::store::{EntityId, MergeReport, Snapshot, StateStore, VersionedValue};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResponse {
    pub player_id: EntityId,
    pub score: i64,
    pub timestamp: i64,
}

/// One cluster member: its state plus the gossip engine that spreads it.
///
/// Cheap to clone; every clone shares the same store and engine.
#[derive(Clone, Debug)]
pub struct Node {
    name: Arc<str>,
    store: StateStore,
    engine: GossipEngine,
}

impl Node {
    /// Build a node that gossips over HTTP
    pub fn new(settings: &settings::Settings) -> Result<Self> {
        let transport = Arc::new(HttpPeerTransport::new()?);
        Self::with_transport(settings, StateStore::new(), transport)
    }

    pub fn with_transport(
        settings: &settings::Settings,
        store: StateStore,
        transport: Arc<dyn PeerTransport>,
    ) -> Result<Self> {
        let peers = settings.peer_set();
        let config = settings.gossip_config()?;
        if peers.is_empty() {
            info!(
                "[{}] Starting with no peers, gossip rounds will be skipped",
                settings.node_name
            );
        } else {
            info!(
                "[{}] Starting with {} peers: {:?}",
                settings.node_name,
                peers.len(),
                peers.iter().map(|p| p.as_str()).collect::<Vec<_>>()
            );
        }
        let engine = GossipEngine::new(
            settings.node_name.clone(),
            store.clone(),
            peers,
            transport,
            config,
        );
        Ok(Self {
            name: Arc::from(settings.node_name.as_str()),
            store,
            engine,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn engine(&self) -> &GossipEngine {
        &self.engine
    }

    /// Start the gossip loop on the current runtime
    pub fn spawn_gossip(&self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.engine.clone().run(shutdown))
    }

    /// Local write of a player's score
    pub fn update_score(&self, player_id: EntityId, score: i64) -> UpdateResponse {
        let VersionedValue { value, timestamp } = self.store.set(player_id.clone(), score);
        info!(
            "[{}] updated score for player {}. New score {}",
            self.name, player_id, value
        );
        UpdateResponse {
            player_id,
            score: value,
            timestamp,
        }
    }

    /// Inbound gossip from a peer
    pub fn receive_gossip(&self, payload: Snapshot) -> MergeReport {
        let received = payload.len();
        let report = self.store.merge(payload);
        tracing::debug!(
            "[{}] Merged gossip: {} received, {} applied, {} discarded",
            self.name,
            received,
            report.applied,
            report.discarded
        );
        report
    }

    pub fn state(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn gossip_stats(&self) -> GossipStatsReport {
        self.engine.stats()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::ManualClock;

    fn gen_settings() -> settings::Settings {
        settings::Settings {
            node_name: "node1".to_string(),
            peers: vec!["127.0.0.1:8082".to_string()],
            ..settings::Settings::default()
        }
    }

    #[tokio::test]
    async fn update_then_state() {
        let clock = Arc::new(ManualClock::new(77));
        let node = Node::with_transport(
            &gen_settings(),
            StateStore::with_clock(clock),
            Arc::new(HttpPeerTransport::default()),
        )
        .unwrap();

        let resp = node.update_score("alice".to_string(), 100);
        assert_eq!(
            resp,
            UpdateResponse {
                player_id: "alice".to_string(),
                score: 100,
                timestamp: 77
            }
        );
        assert_eq!(node.state()["alice"], VersionedValue::new(100, 77));
    }

    #[tokio::test]
    async fn engine_shares_the_node_store() {
        let node = Node::new(&gen_settings()).unwrap();
        node.receive_gossip(Snapshot::from([("bob".to_string(), VersionedValue::new(5, 5))]));
        assert_eq!(node.engine().peers().len(), 1);
        assert_eq!(node.store().get("bob"), Some(VersionedValue::new(5, 5)));
        assert_eq!(node.gossip_stats(), GossipStatsReport::default());
    }

    #[tokio::test]
    async fn invalid_gossip_config_is_rejected() {
        let mut conf = gen_settings();
        conf.gossip_interval_ms = 0;
        assert!(Node::new(&conf).is_err());
    }
}
