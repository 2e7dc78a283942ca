//! Field selection and projection of aggregates.

use crate::error::QueryError;
use crate::query::aggregate::StackVersionAggregate;
use crate::query::criteria::{StackVersionField, CATEGORY};
use crate::query::predicate::Predicate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Set of fields a caller asked for. `None` means every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Option<BTreeSet<StackVersionField>>,
}

impl FieldSelection {
    pub fn all() -> Self {
        Self { fields: None }
    }

    pub fn only(fields: impl IntoIterator<Item = StackVersionField>) -> Self {
        Self {
            fields: Some(fields.into_iter().collect()),
        }
    }

    /// Parse requested property names.
    ///
    /// Accepts bare names and property ids; the category name selects every
    /// field, as does an empty request.
    pub fn parse<I, S>(requested: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = BTreeSet::new();
        for property in requested {
            let property = property.as_ref().trim();
            if property == CATEGORY {
                return Ok(Self::all());
            }
            let field = StackVersionField::from_property(property).ok_or_else(|| {
                QueryError::InvalidArgument(format!("Unsupported property: {}", property))
            })?;
            fields.insert(field);
        }
        if fields.is_empty() {
            Ok(Self::all())
        } else {
            Ok(Self {
                fields: Some(fields),
            })
        }
    }

    pub fn includes(&self, field: StackVersionField) -> bool {
        self.fields
            .as_ref()
            .map(|fields| fields.contains(&field))
            .unwrap_or(true)
    }
}

/// The emitted record: requested fields only, keyed by bare field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Projection(Map<String, Value>);

impl Projection {
    pub fn get(&self, field: StackVersionField) -> Option<&Value> {
        self.0.get(field.name())
    }

    pub fn contains(&self, field: StackVersionField) -> bool {
        self.0.contains_key(field.name())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Strip every field the selection does not include.
pub fn project(aggregate: &StackVersionAggregate, selection: &FieldSelection) -> Projection {
    let fields = StackVersionField::ALL
        .iter()
        .filter(|field| selection.includes(**field))
        .filter_map(|field| {
            aggregate
                .property(*field)
                .map(|value| (field.name().to_string(), value))
        })
        .collect();
    Projection(fields)
}

/// Drop aggregates the predicate rejects, then project the survivors.
///
/// The predicate sees the full aggregate, so it may reference fields the
/// selection excludes.
pub fn filter_and_project(
    aggregates: &[StackVersionAggregate],
    selection: &FieldSelection,
    predicate: Option<&dyn Predicate>,
) -> Vec<Projection> {
    aggregates
        .iter()
        .filter(|aggregate| predicate.map_or(true, |p| p.evaluate(aggregate)))
        .map(|aggregate| project(aggregate, selection))
        .collect()
}
