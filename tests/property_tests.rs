use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use gossiper::store::{ManualClock, Snapshot, StateStore, VersionedValue};
use proptest::prelude::*;

fn payload() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(("[a-e]", -1000i64..1000, 0i64..40), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, value, ts)| (id, VersionedValue::new(value, ts)))
            .collect()
    })
}

/// Highest (timestamp, score) pair per player across all payloads
fn expected_max(payloads: &[Snapshot]) -> Snapshot {
    let mut best: HashMap<String, (i64, i64)> = HashMap::new();
    for payload in payloads {
        for (id, entry) in payload {
            let candidate = (entry.timestamp, entry.value);
            let slot = best.entry(id.clone()).or_insert(candidate);
            if candidate > *slot {
                *slot = candidate;
            }
        }
    }
    best.into_iter()
        .map(|(id, (ts, value))| (id, VersionedValue::new(value, ts)))
        .collect()
}

fn merge_all(payloads: &[Snapshot]) -> Snapshot {
    let store = StateStore::new();
    for payload in payloads {
        store.merge(payload.clone());
    }
    store.snapshot()
}

proptest! {
    #[test]
    fn merge_keeps_the_latest_write_property(payloads in prop::collection::vec(payload(), 0..6)) {
        prop_assert_eq!(merge_all(&payloads), expected_max(&payloads));
    }

    #[test]
    fn merge_order_independence_property(
        (payloads, shuffled) in prop::collection::vec(payload(), 0..6)
            .prop_flat_map(|ps| (Just(ps.clone()), Just(ps).prop_shuffle()))
    ) {
        prop_assert_eq!(merge_all(&payloads), merge_all(&shuffled));
    }

    #[test]
    fn merge_grouping_independence_property(a in payload(), b in payload(), c in payload()) {
        // (a ⊔ b) ⊔ c against a ⊔ (b ⊔ c), each side built on its own node
        let left = StateStore::new();
        left.merge(merge_all(&[a.clone(), b.clone()]));
        left.merge(c.clone());

        let right = StateStore::new();
        right.merge(a);
        right.merge(merge_all(&[b, c]));

        prop_assert_eq!(left.snapshot(), right.snapshot());
    }

    #[test]
    fn merge_idempotence_property(base in payload(), incoming in payload()) {
        let store = StateStore::new();
        store.merge(base);
        store.merge(incoming.clone());
        let once = store.snapshot();
        let report = store.merge(incoming);
        prop_assert_eq!(report.applied, 0);
        prop_assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn local_writes_interleaved_with_stale_merges_property(
        ops in prop::collection::vec((any::<bool>(), "[a-c]", -100i64..100, 0i64..1000), 1..40)
    ) {
        // local clock always runs ahead of anything peers send
        let clock = Arc::new(ManualClock::new(1_000));
        let store = StateStore::with_clock(clock.clone());
        let mut applied: Vec<Snapshot> = Vec::new();

        for (local, id, value, ts) in ops {
            if local {
                clock.advance(1);
                let entry = store.set(id.clone(), value);
                applied.push(Snapshot::from([(id, entry)]));
            } else {
                let incoming = Snapshot::from([(id, VersionedValue::new(value, ts))]);
                store.merge(incoming.clone());
                applied.push(incoming);
            }
        }
        prop_assert_eq!(store.snapshot(), expected_max(&applied));
    }
}

#[test]
fn concurrent_merges_reach_the_same_maximum() {
    let payloads: Vec<Snapshot> = (0..8)
        .map(|n| {
            (0..50)
                .map(|i| {
                    let id = format!("player-{}", i);
                    // interleave which thread holds the newest entry per player
                    let ts = ((i * 7 + n * 13) % 17) as i64;
                    (id, VersionedValue::new(n as i64, ts))
                })
                .collect()
        })
        .collect();

    let store = StateStore::new();
    let handles: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|payload| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    store.merge(payload.clone());
                    let _ = store.snapshot();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.snapshot(), expected_max(&payloads));
}
