//! Cluster stack version query service.
//!
//! Read-only entry point over the three leaf stores: resolves criteria,
//! aggregates each resolved entry from live state, then filters and projects.
//! Holds no cache and no locks; every call re-reads the stores.

use crate::error::QueryError;
use crate::query::aggregate::{aggregate, StackVersionAggregate};
use crate::query::criteria::CriteriaMap;
use crate::query::predicate::Predicate;
use crate::query::projection::{filter_and_project, FieldSelection, Projection};
use crate::query::resolver::resolve;
use crate::store::{ClusterVersionDirectory, NodeVersionLedger, RepositoryCatalog};
use std::sync::Arc;
use tracing::{debug, warn};

/// A read request: lookup criteria plus the fields to emit.
#[derive(Debug, Clone, Default)]
pub struct StackVersionRequest {
    pub criteria: Vec<CriteriaMap>,
    pub fields: FieldSelection,
}

impl StackVersionRequest {
    pub fn new(criteria: Vec<CriteriaMap>) -> Self {
        Self {
            criteria,
            fields: FieldSelection::all(),
        }
    }

    pub fn with_fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }
}

pub struct StackVersionService {
    catalog: Arc<dyn RepositoryCatalog>,
    ledger: Arc<dyn NodeVersionLedger>,
    directory: Arc<dyn ClusterVersionDirectory>,
}

impl StackVersionService {
    pub fn new(
        catalog: Arc<dyn RepositoryCatalog>,
        ledger: Arc<dyn NodeVersionLedger>,
        directory: Arc<dyn ClusterVersionDirectory>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            directory,
        }
    }

    /// Service over a single backend implementing all three stores.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: RepositoryCatalog + NodeVersionLedger + ClusterVersionDirectory + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// Resolve criteria and aggregate every resolved entry, unprojected.
    pub fn aggregates(&self, criteria: &[CriteriaMap]) -> Result<Vec<StackVersionAggregate>, QueryError> {
        let entries = resolve(criteria, self.directory.as_ref())?;
        let mut aggregates = Vec::with_capacity(entries.len());
        for entry in &entries {
            let aggregate = aggregate(entry, self.ledger.as_ref(), self.catalog.as_ref())?;
            debug!(
                id = aggregate.id,
                cluster = %aggregate.cluster_name,
                nodes = aggregate.node_count(),
                "Aggregated stack version"
            );
            aggregates.push(aggregate);
        }
        Ok(aggregates)
    }

    /// Read projected aggregates matching the request and optional predicate.
    pub fn get_resources(
        &self,
        request: &StackVersionRequest,
        predicate: Option<&dyn Predicate>,
    ) -> Result<Vec<Projection>, QueryError> {
        let aggregates = self.aggregates(&request.criteria)?;
        let projections = filter_and_project(&aggregates, &request.fields, predicate);
        debug!(
            resolved = aggregates.len(),
            returned = projections.len(),
            "Stack version query complete"
        );
        Ok(projections)
    }

    pub fn create_resources(&self, _request: &StackVersionRequest) -> Result<(), QueryError> {
        warn!("Rejected create on read-only stack versions");
        Err(QueryError::UnsupportedOperation("create"))
    }

    pub fn update_resources(
        &self,
        _request: &StackVersionRequest,
        _predicate: Option<&dyn Predicate>,
    ) -> Result<(), QueryError> {
        warn!("Rejected update on read-only stack versions");
        Err(QueryError::UnsupportedOperation("update"))
    }

    pub fn delete_resources(&self, _predicate: Option<&dyn Predicate>) -> Result<(), QueryError> {
        warn!("Rejected delete on read-only stack versions");
        Err(QueryError::UnsupportedOperation("delete"))
    }
}
