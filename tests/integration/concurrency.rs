//! Concurrent reads while an external writer moves nodes between states

use super::support::{entry, node};
use stackstate::query::criteria::for_id;
use stackstate::query::StackVersionService;
use stackstate::store::MemoryStore;
use stackstate::types::LifecycleState;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const NODES: usize = 64;

#[test]
fn test_reads_stay_partitioned_during_writes() {
    let store = Arc::new(MemoryStore::new());
    store
        .put_cluster_version(entry(1, "c1", "2.2.0.0", LifecycleState::Installing))
        .unwrap();
    for i in 0..NODES {
        store.put_node_version(node(&format!("h{}", i), "c1", "2.2.0.0", LifecycleState::Installing));
    }
    let service = StackVersionService::from_store(store.clone());
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..20 {
                let state = LifecycleState::ALL[round % LifecycleState::ALL.len()];
                for i in 0..NODES {
                    store.set_node_state(&format!("h{}", i), "c1", "HDP-2.2", "2.2.0.0", state);
                }
            }
            done.store(true, Ordering::SeqCst);
        });

        for _ in 0..4 {
            scope.spawn(|| {
                let mut reads = 0;
                while !done.load(Ordering::SeqCst) || reads == 0 {
                    let aggregates = service.aggregates(&[for_id("c1", 1)]).unwrap();
                    let aggregate = &aggregates[0];

                    assert_eq!(aggregate.node_states.len(), LifecycleState::ALL.len());
                    let mut seen = HashSet::new();
                    for nodes in aggregate.node_states.values() {
                        for name in nodes {
                            assert!(seen.insert(name.clone()), "{} in two buckets", name);
                        }
                    }
                    assert_eq!(seen.len(), NODES);
                    reads += 1;
                }
            });
        }
    });
}
