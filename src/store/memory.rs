//! In-memory stores.
//!
//! Implements all three leaf traits over lock-guarded maps. Writer methods
//! stand in for the external orchestrator in tests and embedded use.

use crate::error::StorageError;
use crate::store::{
    ClusterVersionDirectory, ClusterVersionEntry, NodeVersionLedger, NodeVersionRecord,
    RepositoryCatalog, RepositoryCatalogEntry,
};
use crate::types::{ClusterVersionId, LifecycleState};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type NodeKey = (String, String, String, String);

#[derive(Default)]
pub struct MemoryStore {
    catalog: RwLock<HashMap<(String, String), RepositoryCatalogEntry>>,
    nodes: RwLock<BTreeMap<NodeKey, NodeVersionRecord>>,
    cluster_versions: RwLock<BTreeMap<ClusterVersionId, ClusterVersionEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) the catalog entry for its (stack, version).
    pub fn publish_catalog_entry(&self, entry: RepositoryCatalogEntry) {
        self.catalog
            .write()
            .insert((entry.stack.clone(), entry.version.clone()), entry);
    }

    /// Insert or overwrite the record for its (node, cluster, stack, version).
    pub fn put_node_version(&self, record: NodeVersionRecord) {
        let key = (
            record.cluster_name.clone(),
            record.stack.clone(),
            record.version.clone(),
            record.node_name.clone(),
        );
        self.nodes.write().insert(key, record);
    }

    /// Move an existing node record to a new state. Returns false if absent.
    pub fn set_node_state(
        &self,
        node_name: &str,
        cluster_name: &str,
        stack: &str,
        version: &str,
        state: LifecycleState,
    ) -> bool {
        let key = (
            cluster_name.to_string(),
            stack.to_string(),
            version.to_string(),
            node_name.to_string(),
        );
        match self.nodes.write().get_mut(&key) {
            Some(record) => {
                record.state = state;
                true
            }
            None => false,
        }
    }

    pub fn remove_node_version(
        &self,
        node_name: &str,
        cluster_name: &str,
        stack: &str,
        version: &str,
    ) -> Option<NodeVersionRecord> {
        let key = (
            cluster_name.to_string(),
            stack.to_string(),
            version.to_string(),
            node_name.to_string(),
        );
        self.nodes.write().remove(&key)
    }

    /// Insert or update a cluster version entry.
    ///
    /// Fails if a different id already owns the entry's (cluster, stack, version).
    pub fn put_cluster_version(&self, entry: ClusterVersionEntry) -> Result<(), StorageError> {
        let mut entries = self.cluster_versions.write();
        let conflict = entries.values().find(|existing| {
            existing.id != entry.id
                && existing.cluster_name == entry.cluster_name
                && existing.stack == entry.stack
                && existing.version == entry.version
        });
        if let Some(existing) = conflict {
            return Err(StorageError::Conflict(format!(
                "cluster {} already tracks {}-{} as id {}",
                existing.cluster_name, existing.stack, existing.version, existing.id
            )));
        }
        entries.insert(entry.id, entry);
        Ok(())
    }

    pub fn remove_cluster_version(&self, id: ClusterVersionId) -> Option<ClusterVersionEntry> {
        self.cluster_versions.write().remove(&id)
    }
}

impl RepositoryCatalog for MemoryStore {
    fn find_entry(
        &self,
        stack: &str,
        version: &str,
    ) -> Result<Option<RepositoryCatalogEntry>, StorageError> {
        Ok(self
            .catalog
            .read()
            .get(&(stack.to_string(), version.to_string()))
            .cloned())
    }
}

impl NodeVersionLedger for MemoryStore {
    fn find_nodes(
        &self,
        cluster_name: &str,
        stack: &str,
        version: &str,
    ) -> Result<Vec<NodeVersionRecord>, StorageError> {
        let start = (
            cluster_name.to_string(),
            stack.to_string(),
            version.to_string(),
            String::new(),
        );
        Ok(self
            .nodes
            .read()
            .range(start..)
            .take_while(|((c, s, v, _), _)| c == cluster_name && s == stack && v == version)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

impl ClusterVersionDirectory for MemoryStore {
    fn find_by_id(&self, id: ClusterVersionId) -> Result<Option<ClusterVersionEntry>, StorageError> {
        Ok(self.cluster_versions.read().get(&id).cloned())
    }

    fn find_by_cluster(&self, cluster_name: &str) -> Result<Vec<ClusterVersionEntry>, StorageError> {
        Ok(self
            .cluster_versions
            .read()
            .values()
            .filter(|entry| entry.cluster_name == cluster_name)
            .cloned()
            .collect())
    }
}
