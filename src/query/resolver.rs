//! Lookup resolution: criteria maps to cluster version directory entries.

use crate::error::QueryError;
use crate::query::criteria::{self, CriteriaMap, StackVersionField};
use crate::store::{ClusterVersionDirectory, ClusterVersionEntry};
use tracing::{debug, warn};

/// Resolve every criteria map against the directory.
///
/// A single map without an id lists every entry of its cluster. In every
/// other case the id is required, must be numeric and must exist. Entries
/// are accumulated in criteria order without de-duplication.
pub fn resolve(
    criteria: &[CriteriaMap],
    directory: &dyn ClusterVersionDirectory,
) -> Result<Vec<ClusterVersionEntry>, QueryError> {
    let mut entries = Vec::new();
    let list_mode_allowed = criteria.len() == 1;

    for map in criteria {
        let cluster_name = criteria::cluster_name(map)?;

        match criteria::criteria_value(map, StackVersionField::Id) {
            None if list_mode_allowed => {
                let found = directory.find_by_cluster(cluster_name)?;
                debug!(cluster = cluster_name, count = found.len(), "Listed cluster stack versions");
                entries.extend(found);
            }
            None => {
                warn!(cluster = cluster_name, "Batched criteria without stack version id");
                return Err(QueryError::InvalidArgument(
                    "Stack version id is required when querying more than one stack version"
                        .to_string(),
                ));
            }
            Some(raw_id) => {
                let id = criteria::parse_id(raw_id).map_err(|e| {
                    warn!(cluster = cluster_name, id = %raw_id, "Non-numeric stack version id");
                    e
                })?;
                let entry = directory.find_by_id(id)?.ok_or_else(|| {
                    warn!(cluster = cluster_name, id, "Stack version not found");
                    QueryError::NotFound(id)
                })?;
                debug!(cluster = cluster_name, id, "Resolved stack version");
                entries.push(entry);
            }
        }
    }

    Ok(entries)
}
