//! Leaf stores
//!
//! The three read interfaces the aggregation core depends on: the repository
//! catalog, the node version ledger and the cluster version directory. The
//! core only ever reads through these traits; writers live outside of it.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::SledStackStore;

use crate::error::StorageError;
use crate::types::{ClusterVersionId, LifecycleState};
use serde::{Deserialize, Serialize};

/// Opaque repository definition, passed through unchanged.
pub type RepositoryDescriptor = serde_json::Value;

/// Published repository definitions for one (stack, version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryCatalogEntry {
    pub stack: String,
    pub version: String,
    /// Ordered as published.
    pub repositories: Vec<RepositoryDescriptor>,
}

/// A node's lifecycle state for one (cluster, stack, version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVersionRecord {
    pub node_name: String,
    pub cluster_name: String,
    pub stack: String,
    pub version: String,
    pub state: LifecycleState,
}

impl NodeVersionRecord {
    /// True when the record belongs to the given (cluster, stack, version) scope.
    pub fn in_scope(&self, cluster_name: &str, stack: &str, version: &str) -> bool {
        self.cluster_name == cluster_name && self.stack == stack && self.version == version
    }
}

/// The per-(cluster, stack, version) rollout record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterVersionEntry {
    pub id: ClusterVersionId,
    pub cluster_name: String,
    pub stack: String,
    pub version: String,
    pub state: LifecycleState,
}

/// Point lookup of repository definitions.
pub trait RepositoryCatalog: Send + Sync {
    /// Absence is not an error.
    fn find_entry(
        &self,
        stack: &str,
        version: &str,
    ) -> Result<Option<RepositoryCatalogEntry>, StorageError>;
}

/// Read access to per-node version records.
pub trait NodeVersionLedger: Send + Sync {
    /// Scan every node record for (cluster, stack, version).
    ///
    /// Reads live state on each call; implementations must not cache.
    fn find_nodes(
        &self,
        cluster_name: &str,
        stack: &str,
        version: &str,
    ) -> Result<Vec<NodeVersionRecord>, StorageError>;
}

/// Read access to cluster version entries.
pub trait ClusterVersionDirectory: Send + Sync {
    fn find_by_id(&self, id: ClusterVersionId) -> Result<Option<ClusterVersionEntry>, StorageError>;

    /// All entries for a cluster; empty when the cluster tracks none.
    fn find_by_cluster(&self, cluster_name: &str) -> Result<Vec<ClusterVersionEntry>, StorageError>;
}
