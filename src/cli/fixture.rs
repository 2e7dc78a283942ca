//! Store snapshots: the JSON document `stackstate import` loads.

use crate::store::{
    ClusterVersionEntry, NodeVersionRecord, RepositoryCatalogEntry, SledStackStore,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub repository_catalog: Vec<RepositoryCatalogEntry>,
    #[serde(default)]
    pub cluster_versions: Vec<ClusterVersionEntry>,
    #[serde(default)]
    pub node_versions: Vec<NodeVersionRecord>,
}

/// Counts of records written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub catalog_entries: usize,
    pub cluster_versions: usize,
    pub node_versions: usize,
}

impl StoreSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    /// Write every record into the store, then flush.
    pub fn apply(&self, store: &SledStackStore) -> Result<ImportSummary> {
        for entry in &self.repository_catalog {
            store
                .publish_catalog_entry(entry)
                .with_context(|| format!("Failed to publish {}-{}", entry.stack, entry.version))?;
        }
        for entry in &self.cluster_versions {
            store
                .put_cluster_version(entry)
                .with_context(|| format!("Failed to store cluster version {}", entry.id))?;
        }
        for record in &self.node_versions {
            store.put_node_version(record).with_context(|| {
                format!(
                    "Failed to store node {} for {}-{}",
                    record.node_name, record.stack, record.version
                )
            })?;
        }
        store.flush().context("Failed to flush store")?;

        Ok(ImportSummary {
            catalog_entries: self.repository_catalog.len(),
            cluster_versions: self.cluster_versions.len(),
            node_versions: self.node_versions.len(),
        })
    }
}
