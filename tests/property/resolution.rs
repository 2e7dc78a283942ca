//! Resolution properties: list mode, id validation, not-found

use proptest::prelude::*;
use serde_json::json;
use stackstate::error::QueryError;
use stackstate::query::criteria::{for_cluster, for_id};
use stackstate::query::resolve;
use stackstate::store::{ClusterVersionDirectory, ClusterVersionEntry, MemoryStore};
use stackstate::types::LifecycleState;

fn populated(entries: &[(String, String)]) -> MemoryStore {
    let store = MemoryStore::new();
    for (index, (cluster, version)) in entries.iter().enumerate() {
        // Repeated scopes are rejected by the store; skip them.
        let _ = store.put_cluster_version(ClusterVersionEntry {
            id: index as i64 + 1,
            cluster_name: cluster.clone(),
            stack: "HDP-2.2".to_string(),
            version: version.clone(),
            state: LifecycleState::Installed,
        });
    }
    store
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("c[0-3]", "2\\.2\\.[0-4]\\.0"), 0..16)
}

/// A lone id-less criteria map is the cluster scan.
#[test]
fn test_list_mode_equals_cluster_scan() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(entries_strategy(), "c[0-4]"), |(entries, cluster)| {
            let store = populated(&entries);
            let mut resolved: Vec<i64> = resolve(&[for_cluster(cluster.as_str())], &store)
                .unwrap()
                .into_iter()
                .map(|e| e.id)
                .collect();
            let mut scanned: Vec<i64> = store
                .find_by_cluster(&cluster)
                .unwrap()
                .into_iter()
                .map(|e| e.id)
                .collect();
            resolved.sort_unstable();
            scanned.sort_unstable();
            prop_assert_eq!(resolved, scanned);
            Ok(())
        })
        .unwrap();
}

/// Ids that do not read as integers are rejected before any lookup.
#[test]
fn test_non_numeric_ids_are_invalid() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(entries_strategy(), "[a-zA-Z][a-zA-Z0-9_]{0,8}"), |(entries, id)| {
            let store = populated(&entries);
            let mut criteria = for_cluster("c0");
            criteria.insert("id".to_string(), json!(id));
            let result = resolve(&[criteria], &store);
            prop_assert!(matches!(result, Err(QueryError::InvalidArgument(_))));
            Ok(())
        })
        .unwrap();
}

/// Unknown ids fail with NotFound naming the id.
#[test]
fn test_unknown_ids_are_not_found() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(entries_strategy(), 100i64..1_000_000), |(entries, id)| {
            let store = populated(&entries);
            match resolve(&[for_id("c0", id)], &store) {
                Err(QueryError::NotFound(missing)) => prop_assert_eq!(missing, id),
                other => prop_assert!(false, "expected NotFound, got {:?}", other),
            }
            Ok(())
        })
        .unwrap();
}
