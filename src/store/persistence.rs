//! Persistence layer for the leaf stores

use crate::error::StorageError;
use crate::store::{
    ClusterVersionDirectory, ClusterVersionEntry, NodeVersionLedger, NodeVersionRecord,
    RepositoryCatalog, RepositoryCatalogEntry,
};
use crate::types::ClusterVersionId;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use std::path::Path;
use tracing::debug;

const CATALOG_TREE: &str = "repository_catalog";
const NODE_VERSIONS_TREE: &str = "node_versions";
const CLUSTER_VERSIONS_TREE: &str = "cluster_versions";
const CLUSTER_VERSION_INDEX_TREE: &str = "cluster_version_index";

/// Each key component is written as a big-endian u32 length followed by its
/// bytes, so a key for fewer components is a prefix of exactly the keys that
/// share those components, whatever bytes the names contain.
fn scoped_key<S: AsRef<str>>(parts: &[S]) -> Vec<u8> {
    let mut key = Vec::new();
    for part in parts {
        let bytes = part.as_ref().as_bytes();
        key.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        key.extend_from_slice(bytes);
    }
    key
}

fn id_key(id: ClusterVersionId) -> [u8; 8] {
    id.to_be_bytes()
}

fn id_from_bytes(bytes: &[u8]) -> Result<ClusterVersionId, StorageError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        StorageError::Serialization(format!("Invalid cluster version id length: {}", bytes.len()))
    })?;
    Ok(ClusterVersionId::from_be_bytes(raw))
}

fn flatten_transaction_error(err: TransactionError<StorageError>) -> StorageError {
    match err {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => err.into(),
    }
}

/// Sled-backed implementation of all three leaf stores.
///
/// Catalog descriptors are opaque JSON values, so catalog entries are stored
/// as JSON; node and cluster version records use bincode.
pub struct SledStackStore {
    db: sled::Db,
    catalog: sled::Tree,
    node_versions: sled::Tree,
    cluster_versions: sled::Tree,
    cluster_version_index: sled::Tree,
}

impl SledStackStore {
    /// Open (or create) a store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to open sled database: {}", e),
            ))
        })?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            catalog: db.open_tree(CATALOG_TREE)?,
            node_versions: db.open_tree(NODE_VERSIONS_TREE)?,
            cluster_versions: db.open_tree(CLUSTER_VERSIONS_TREE)?,
            cluster_version_index: db.open_tree(CLUSTER_VERSION_INDEX_TREE)?,
            db,
        })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    pub fn publish_catalog_entry(&self, entry: &RepositoryCatalogEntry) -> Result<(), StorageError> {
        let key = scoped_key(&[&entry.stack, &entry.version]);
        let value = serde_json::to_vec(entry)?;
        self.catalog.insert(key, value)?;
        Ok(())
    }

    pub fn put_node_version(&self, record: &NodeVersionRecord) -> Result<(), StorageError> {
        let key = scoped_key(&[
            &record.cluster_name,
            &record.stack,
            &record.version,
            &record.node_name,
        ]);
        let value = bincode::serialize(record)?;
        self.node_versions.insert(key, value)?;
        Ok(())
    }

    pub fn remove_node_version(
        &self,
        node_name: &str,
        cluster_name: &str,
        stack: &str,
        version: &str,
    ) -> Result<bool, StorageError> {
        let key = scoped_key(&[cluster_name, stack, version, node_name]);
        Ok(self.node_versions.remove(key)?.is_some())
    }

    /// Insert or update a cluster version entry together with its scope index.
    ///
    /// Fails with [`StorageError::Conflict`] if another id already owns the
    /// entry's (cluster, stack, version).
    pub fn put_cluster_version(&self, entry: &ClusterVersionEntry) -> Result<(), StorageError> {
        let record_key = id_key(entry.id);
        let scope_key = scoped_key(&[&entry.cluster_name, &entry.stack, &entry.version]);
        let value = bincode::serialize(entry)?;

        (&self.cluster_versions, &self.cluster_version_index)
            .transaction(|(records, index)| {
                if let Some(owner) = index.get(&scope_key)? {
                    if owner[..] != record_key[..] {
                        return Err(ConflictableTransactionError::Abort(StorageError::Conflict(
                            format!(
                                "cluster {} already tracks {}-{}",
                                entry.cluster_name, entry.stack, entry.version
                            ),
                        )));
                    }
                }
                if let Some(previous) = records.get(record_key)? {
                    let previous: ClusterVersionEntry = bincode::deserialize(&previous)
                        .map_err(|e| ConflictableTransactionError::Abort(e.into()))?;
                    index.remove(scoped_key(&[
                        &previous.cluster_name,
                        &previous.stack,
                        &previous.version,
                    ]))?;
                }
                records.insert(&record_key[..], value.as_slice())?;
                index.insert(scope_key.as_slice(), &record_key[..])?;
                Ok(())
            })
            .map_err(flatten_transaction_error)
    }

    pub fn remove_cluster_version(&self, id: ClusterVersionId) -> Result<bool, StorageError> {
        let record_key = id_key(id);
        (&self.cluster_versions, &self.cluster_version_index)
            .transaction(|(records, index)| {
                match records.remove(&record_key[..])? {
                    Some(previous) => {
                        let previous: ClusterVersionEntry = bincode::deserialize(&previous)
                            .map_err(|e| ConflictableTransactionError::Abort(e.into()))?;
                        index.remove(scoped_key(&[
                            &previous.cluster_name,
                            &previous.stack,
                            &previous.version,
                        ]))?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .map_err(flatten_transaction_error)
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl RepositoryCatalog for SledStackStore {
    fn find_entry(
        &self,
        stack: &str,
        version: &str,
    ) -> Result<Option<RepositoryCatalogEntry>, StorageError> {
        match self.catalog.get(scoped_key(&[stack, version]))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }
}

impl NodeVersionLedger for SledStackStore {
    fn find_nodes(
        &self,
        cluster_name: &str,
        stack: &str,
        version: &str,
    ) -> Result<Vec<NodeVersionRecord>, StorageError> {
        let prefix = scoped_key(&[cluster_name, stack, version]);
        let mut records = Vec::new();
        for item in self.node_versions.scan_prefix(prefix) {
            let (_, value) = item?;
            let record: NodeVersionRecord = bincode::deserialize(&value)?;
            if record.in_scope(cluster_name, stack, version) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

impl ClusterVersionDirectory for SledStackStore {
    fn find_by_id(&self, id: ClusterVersionId) -> Result<Option<ClusterVersionEntry>, StorageError> {
        match self.cluster_versions.get(id_key(id))? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    fn find_by_cluster(&self, cluster_name: &str) -> Result<Vec<ClusterVersionEntry>, StorageError> {
        let prefix = scoped_key(&[cluster_name]);
        let mut entries = Vec::new();
        for item in self.cluster_version_index.scan_prefix(prefix) {
            let (_, id_bytes) = item?;
            let id = id_from_bytes(&id_bytes)?;
            // The entry may be removed between the index scan and the read.
            match self.find_by_id(id)? {
                Some(entry) if entry.cluster_name == cluster_name => entries.push(entry),
                Some(entry) => {
                    debug!(id, cluster = %entry.cluster_name, "Skipping cluster version rescoped during scan")
                }
                None => debug!(id, "Skipping cluster version removed during scan"),
            }
        }
        Ok(entries)
    }
}
