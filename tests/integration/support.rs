//! Shared fixtures for integration tests

use stackstate::store::{
    ClusterVersionEntry, MemoryStore, NodeVersionRecord, RepositoryCatalogEntry,
};
use stackstate::types::{ClusterVersionId, LifecycleState};
use std::sync::Arc;

pub const STACK: &str = "HDP-2.2";

pub fn entry(id: ClusterVersionId, cluster: &str, version: &str, state: LifecycleState) -> ClusterVersionEntry {
    ClusterVersionEntry {
        id,
        cluster_name: cluster.to_string(),
        stack: STACK.to_string(),
        version: version.to_string(),
        state,
    }
}

pub fn node(name: &str, cluster: &str, version: &str, state: LifecycleState) -> NodeVersionRecord {
    NodeVersionRecord {
        node_name: name.to_string(),
        cluster_name: cluster.to_string(),
        stack: STACK.to_string(),
        version: version.to_string(),
        state,
    }
}

pub fn catalog_entry(version: &str) -> RepositoryCatalogEntry {
    RepositoryCatalogEntry {
        stack: STACK.to_string(),
        version: version.to_string(),
        repositories: vec![
            serde_json::json!({"repo_id": "HDP-2.2", "base_url": "http://repo/hdp"}),
            serde_json::json!({"repo_id": "HDP-UTILS-1.1", "base_url": "http://repo/utils"}),
        ],
    }
}

/// Two clusters, three tracked versions, a catalog entry for 2.2.0.0 only.
///
/// c1 / 2.2.0.0 (id 1): h1, h2 CURRENT; h3 INSTALLED
/// c1 / 2.2.1.0 (id 2): h1 INSTALLING; h2 INSTALL_FAILED
/// c2 / 2.2.0.0 (id 3): h9 OUT_OF_SYNC
pub fn populated_memory_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.publish_catalog_entry(catalog_entry("2.2.0.0"));

    store
        .put_cluster_version(entry(1, "c1", "2.2.0.0", LifecycleState::Current))
        .unwrap();
    store
        .put_cluster_version(entry(2, "c1", "2.2.1.0", LifecycleState::Installing))
        .unwrap();
    store
        .put_cluster_version(entry(3, "c2", "2.2.0.0", LifecycleState::OutOfSync))
        .unwrap();

    store.put_node_version(node("h1", "c1", "2.2.0.0", LifecycleState::Current));
    store.put_node_version(node("h2", "c1", "2.2.0.0", LifecycleState::Current));
    store.put_node_version(node("h3", "c1", "2.2.0.0", LifecycleState::Installed));
    store.put_node_version(node("h1", "c1", "2.2.1.0", LifecycleState::Installing));
    store.put_node_version(node("h2", "c1", "2.2.1.0", LifecycleState::InstallFailed));
    store.put_node_version(node("h9", "c2", "2.2.0.0", LifecycleState::OutOfSync));
    store
}

/// Serializes tests that mutate process environment variables.
pub static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run `f` with the given variables set, restoring their previous values after.
pub fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    for (key, value) in previous {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}
