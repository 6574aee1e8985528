use std::sync::Arc;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::stats::{DeliveryOutcome, GossipStats, GossipStatsReport};
use super::transport::PeerTransport;
use super::{PeerAddress, PeerSet};
use crate::settings::GossipConfig;
use crate::store::{Snapshot, StateStore};

/// What one gossip round did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No peers configured
    Skipped,
    /// A snapshot delivery to this peer was started
    Dispatched(PeerAddress),
}

/// Periodically pushes the full local state to one random peer.
#[derive(Clone)]
pub struct GossipEngine {
    node_name: String,
    store: StateStore,
    peers: Arc<PeerSet>,
    transport: Arc<dyn PeerTransport>,
    config: GossipConfig,
    stats: Arc<GossipStats>,
}

impl std::fmt::Debug for GossipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GossipEngine")
            .field("node_name", &self.node_name)
            .field("peers", &self.peers.len())
            .field("interval_ms", &self.config.interval.as_millis())
            .field("delivery_timeout_ms", &self.config.delivery_timeout.as_millis())
            .finish()
    }
}

impl GossipEngine {
    pub fn new(
        node_name: impl Into<String>,
        store: StateStore,
        peers: PeerSet,
        transport: Arc<dyn PeerTransport>,
        config: GossipConfig,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            store,
            peers: Arc::new(peers),
            transport,
            config,
            stats: Arc::new(GossipStats::default()),
        }
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    pub fn stats(&self) -> GossipStatsReport {
        self.stats.report()
    }

    /// Run one gossip round with the thread-local RNG.
    pub fn tick(&self, in_flight: &mut JoinSet<DeliveryOutcome>) -> TickOutcome {
        self.tick_with(&mut rand::thread_rng(), in_flight)
    }

    /// Pick a peer, copy the store and start the delivery in `in_flight`.
    ///
    /// Returns as soon as the delivery is spawned; it never waits on the network.
    pub fn tick_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        in_flight: &mut JoinSet<DeliveryOutcome>,
    ) -> TickOutcome {
        self.stats.record_round();
        let Some(peer) = self.peers.choose(rng).cloned() else {
            self.stats.record_skip();
            return TickOutcome::Skipped;
        };

        let snapshot = self.store.snapshot();
        let engine = self.clone();
        let target = peer.clone();
        in_flight.spawn(async move { engine.deliver(&target, snapshot).await });
        TickOutcome::Dispatched(peer)
    }

    /// Send `snapshot` to `peer`, giving up after the delivery timeout.
    ///
    /// Failures are only logged and counted. The next round is the retry.
    pub async fn deliver(&self, peer: &PeerAddress, snapshot: Snapshot) -> DeliveryOutcome {
        let entries = snapshot.len();
        let send = self.transport.send(peer, &snapshot);
        let outcome = match time::timeout(self.config.delivery_timeout, send).await {
            Ok(Ok(())) => DeliveryOutcome::Delivered,
            Ok(Err(e)) => DeliveryOutcome::Failed(e.to_string()),
            Err(_) => DeliveryOutcome::TimedOut,
        };

        // A down peer fails every few rounds, keep this out of info logs
        match &outcome {
            DeliveryOutcome::Delivered => {
                debug!("[{}] Gossiped {} entries to {}", self.node_name, entries, peer)
            }
            DeliveryOutcome::Failed(reason) => {
                debug!("[{}] Gossip to {} failed: {}", self.node_name, peer, reason)
            }
            DeliveryOutcome::TimedOut => debug!(
                "[{}] Gossip to {} timed out after {}ms",
                self.node_name,
                peer,
                self.config.delivery_timeout.as_millis()
            ),
        }
        self.stats.record_outcome(&outcome);
        outcome
    }

    /// Gossip every interval until `shutdown` turns true or its sender is dropped.
    ///
    /// The first round fires one interval after start. Deliveries still in
    /// flight at shutdown are aborted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow() {
            return;
        }
        info!(
            "[{}] Starting gossip loop with {}ms interval and {} peers",
            self.node_name,
            self.config.interval.as_millis(),
            self.peers.len()
        );

        let mut ticker = time::interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: JoinSet<DeliveryOutcome> = JoinSet::new();

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[{}] Gossip loop shutting down", self.node_name);
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let TickOutcome::Dispatched(peer) = self.tick(&mut in_flight) {
                        debug!("[{}] Gossip round dispatched to {}", self.node_name, peer);
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        warn!("[{}] Gossip delivery task failed: {}", self.node_name, e);
                    }
                }
            }
        }

        in_flight.shutdown().await;
    }
}
