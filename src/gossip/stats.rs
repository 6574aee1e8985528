use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// How a single delivery ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
    TimedOut,
}

/// Running counters for the gossip loop
#[derive(Debug, Default)]
pub struct GossipStats {
    rounds: AtomicU64,
    skipped: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

/// Plain copy of [`GossipStats`] for the API
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GossipStatsReport {
    pub rounds: u64,
    pub skipped: u64,
    pub delivered: u64,
    pub failed: u64,
    pub timed_out: u64,
}

impl GossipStats {
    pub fn record_round(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered => &self.delivered,
            DeliveryOutcome::Failed(_) => &self.failed,
            DeliveryOutcome::TimedOut => &self.timed_out,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> GossipStatsReport {
        GossipStatsReport {
            rounds: self.rounds.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_land_in_their_counters() {
        let stats = GossipStats::default();
        stats.record_round();
        stats.record_round();
        stats.record_skip();
        stats.record_outcome(&DeliveryOutcome::Delivered);
        stats.record_outcome(&DeliveryOutcome::Failed("refused".to_string()));
        stats.record_outcome(&DeliveryOutcome::TimedOut);
        stats.record_outcome(&DeliveryOutcome::TimedOut);

        assert_eq!(
            stats.report(),
            GossipStatsReport {
                rounds: 2,
                skipped: 1,
                delivered: 1,
                failed: 1,
                timed_out: 2,
            }
        );
    }
}
