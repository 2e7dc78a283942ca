//! State aggregation
//!
//! Builds the rollout view of one cluster version entry: every node matching
//! the entry's (cluster, stack, version) is placed in the bucket of its
//! lifecycle state, and the catalog's repository list is attached when one is
//! published.

use crate::error::StorageError;
use crate::query::criteria::StackVersionField;
use crate::store::{ClusterVersionEntry, NodeVersionLedger, RepositoryCatalog, RepositoryDescriptor};
use crate::types::{ClusterVersionId, LifecycleState};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Node names grouped by lifecycle state.
pub type NodeBuckets = BTreeMap<LifecycleState, Vec<String>>;

/// One bucket per lifecycle state, all empty.
pub fn empty_buckets() -> NodeBuckets {
    LifecycleState::ALL
        .iter()
        .map(|state| (*state, Vec::new()))
        .collect()
}

/// Fully populated rollout view of a cluster stack version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackVersionAggregate {
    pub id: ClusterVersionId,
    pub cluster_name: String,
    pub stack: String,
    pub version: String,
    pub state: LifecycleState,
    /// Always holds a key for every lifecycle state.
    pub node_states: NodeBuckets,
    /// Absent when no catalog entry is published for (stack, version).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<RepositoryDescriptor>>,
}

impl StackVersionAggregate {
    pub fn nodes_in(&self, state: LifecycleState) -> &[String] {
        self.node_states
            .get(&state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn installed_nodes(&self) -> &[String] {
        self.nodes_in(LifecycleState::Installed)
    }

    pub fn current_nodes(&self) -> &[String] {
        self.nodes_in(LifecycleState::Current)
    }

    /// Number of nodes across all buckets.
    pub fn node_count(&self) -> usize {
        self.node_states.values().map(Vec::len).sum()
    }

    /// JSON value of a field; `None` only for repositories without a catalog entry.
    pub fn property(&self, field: StackVersionField) -> Option<Value> {
        match field {
            StackVersionField::Id => Some(Value::from(self.id)),
            StackVersionField::ClusterName => Some(Value::from(self.cluster_name.as_str())),
            StackVersionField::Stack => Some(Value::from(self.stack.as_str())),
            StackVersionField::Version => Some(Value::from(self.version.as_str())),
            StackVersionField::State => Some(Value::from(self.state.as_str())),
            StackVersionField::InstalledNodes => Some(Value::from(self.installed_nodes().to_vec())),
            StackVersionField::CurrentNodes => Some(Value::from(self.current_nodes().to_vec())),
            StackVersionField::NodeStates => Some(Value::Object(
                self.node_states
                    .iter()
                    .map(|(state, nodes)| (state.as_str().to_string(), Value::from(nodes.clone())))
                    .collect(),
            )),
            StackVersionField::Repositories => self.repositories.clone().map(Value::Array),
        }
    }
}

/// Aggregate one directory entry from live ledger and catalog state.
///
/// Records outside the entry's scope and repeated node names are skipped, so
/// the buckets always partition exactly the in-scope nodes.
pub fn aggregate(
    entry: &ClusterVersionEntry,
    ledger: &dyn NodeVersionLedger,
    catalog: &dyn RepositoryCatalog,
) -> Result<StackVersionAggregate, StorageError> {
    let mut node_states = empty_buckets();
    let mut seen = HashSet::new();

    for record in ledger.find_nodes(&entry.cluster_name, &entry.stack, &entry.version)? {
        if !record.in_scope(&entry.cluster_name, &entry.stack, &entry.version) {
            debug!(node = %record.node_name, cluster = %record.cluster_name, "Skipping out-of-scope node record");
            continue;
        }
        if !seen.insert(record.node_name.clone()) {
            debug!(node = %record.node_name, "Skipping repeated node record");
            continue;
        }
        node_states
            .entry(record.state)
            .or_default()
            .push(record.node_name);
    }

    let repositories = catalog
        .find_entry(&entry.stack, &entry.version)?
        .map(|catalog_entry| catalog_entry.repositories);
    if repositories.is_none() {
        debug!(stack = %entry.stack, version = %entry.version, "No repository catalog entry");
    }

    Ok(StackVersionAggregate {
        id: entry.id,
        cluster_name: entry.cluster_name.clone(),
        stack: entry.stack.clone(),
        version: entry.version.clone(),
        state: entry.state,
        node_states,
        repositories,
    })
}
