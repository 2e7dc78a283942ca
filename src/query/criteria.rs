//! Property ids and lookup criteria for cluster stack version queries.

use crate::error::QueryError;
use crate::types::ClusterVersionId;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Category prefix of every property id.
pub const CATEGORY: &str = "ClusterStackVersions";

/// One string-keyed filter map; keys are bare field names or property ids.
pub type CriteriaMap = BTreeMap<String, Value>;

/// Fields of a stack version aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackVersionField {
    Id,
    ClusterName,
    Stack,
    Version,
    State,
    InstalledNodes,
    CurrentNodes,
    NodeStates,
    Repositories,
}

impl StackVersionField {
    pub const ALL: [StackVersionField; 9] = [
        StackVersionField::Id,
        StackVersionField::ClusterName,
        StackVersionField::Stack,
        StackVersionField::Version,
        StackVersionField::State,
        StackVersionField::InstalledNodes,
        StackVersionField::CurrentNodes,
        StackVersionField::NodeStates,
        StackVersionField::Repositories,
    ];

    /// Bare field name, e.g. `cluster_name`.
    pub fn name(&self) -> &'static str {
        match self {
            StackVersionField::Id => "id",
            StackVersionField::ClusterName => "cluster_name",
            StackVersionField::Stack => "stack",
            StackVersionField::Version => "version",
            StackVersionField::State => "state",
            StackVersionField::InstalledNodes => "installed_nodes",
            StackVersionField::CurrentNodes => "current_nodes",
            StackVersionField::NodeStates => "node_states",
            StackVersionField::Repositories => "repositories",
        }
    }

    /// Category-qualified id, e.g. `ClusterStackVersions/cluster_name`.
    pub fn property_id(&self) -> String {
        format!("{}/{}", CATEGORY, self.name())
    }

    /// Resolve a bare name or a property id.
    pub fn from_property(property: &str) -> Option<Self> {
        let name = property
            .strip_prefix(CATEGORY)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(property);
        StackVersionField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
    }
}

impl fmt::Display for StackVersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of `field` in a criteria map. JSON null counts as absent.
pub fn criteria_value(criteria: &CriteriaMap, field: StackVersionField) -> Option<&Value> {
    criteria
        .get(field.name())
        .or_else(|| criteria.get(&field.property_id()))
        .filter(|value| !value.is_null())
}

/// The cluster name every criteria map must carry.
pub fn cluster_name(criteria: &CriteriaMap) -> Result<&str, QueryError> {
    match criteria_value(criteria, StackVersionField::ClusterName) {
        Some(Value::String(name)) => Ok(name),
        Some(other) => Err(QueryError::InvalidArgument(format!(
            "cluster_name must be a string, got {}",
            other
        ))),
        None => Err(QueryError::InvalidArgument(
            "cluster_name is required".to_string(),
        )),
    }
}

/// Parse an id given as a JSON integer or a numeric string.
pub fn parse_id(value: &Value) -> Result<ClusterVersionId, QueryError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse::<ClusterVersionId>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        QueryError::InvalidArgument(format!("Stack version id must be numeric, got {}", value))
    })
}

/// Criteria listing every stack version of a cluster.
pub fn for_cluster(cluster_name: impl Into<String>) -> CriteriaMap {
    let mut criteria = CriteriaMap::new();
    criteria.insert(
        StackVersionField::ClusterName.name().to_string(),
        Value::String(cluster_name.into()),
    );
    criteria
}

/// Criteria for a single stack version by id.
pub fn for_id(cluster_name: impl Into<String>, id: ClusterVersionId) -> CriteriaMap {
    let mut criteria = for_cluster(cluster_name);
    criteria.insert(StackVersionField::Id.name().to_string(), Value::from(id));
    criteria
}
