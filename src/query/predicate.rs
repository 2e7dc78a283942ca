//! Caller predicates over fully populated aggregates.

use crate::error::QueryError;
use crate::query::aggregate::StackVersionAggregate;
use crate::query::criteria::StackVersionField;
use serde_json::Value;
use std::str::FromStr;

/// Boolean test over an aggregate.
///
/// Always evaluated against the complete aggregate, never a projection.
pub trait Predicate: Send + Sync {
    fn evaluate(&self, aggregate: &StackVersionAggregate) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&StackVersionAggregate) -> bool + Send + Sync,
{
    fn evaluate(&self, aggregate: &StackVersionAggregate) -> bool {
        self(aggregate)
    }
}

/// Composable property predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyPredicate {
    /// Field equals the value. List-valued fields match when they contain it;
    /// a string value also matches a scalar whose textual form is equal.
    Equals(StackVersionField, Value),
    And(Vec<PropertyPredicate>),
    Or(Vec<PropertyPredicate>),
    Not(Box<PropertyPredicate>),
}

impl PropertyPredicate {
    pub fn equals(field: StackVersionField, value: impl Into<Value>) -> Self {
        PropertyPredicate::Equals(field, value.into())
    }

    pub fn and(self, other: PropertyPredicate) -> Self {
        match self {
            PropertyPredicate::And(mut predicates) => {
                predicates.push(other);
                PropertyPredicate::And(predicates)
            }
            predicate => PropertyPredicate::And(vec![predicate, other]),
        }
    }

    pub fn or(self, other: PropertyPredicate) -> Self {
        match self {
            PropertyPredicate::Or(mut predicates) => {
                predicates.push(other);
                PropertyPredicate::Or(predicates)
            }
            predicate => PropertyPredicate::Or(vec![predicate, other]),
        }
    }

    pub fn negate(self) -> Self {
        PropertyPredicate::Not(Box::new(self))
    }
}

fn scalar_matches(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(number), Value::String(text)) => number.to_string() == *text,
        (Value::Bool(flag), Value::String(text)) => flag.to_string() == *text,
        _ => false,
    }
}

fn value_matches(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| scalar_matches(item, expected))
        }
        _ => scalar_matches(actual, expected),
    }
}

impl Predicate for PropertyPredicate {
    fn evaluate(&self, aggregate: &StackVersionAggregate) -> bool {
        match self {
            PropertyPredicate::Equals(field, expected) => aggregate
                .property(*field)
                .map(|actual| value_matches(&actual, expected))
                .unwrap_or(false),
            PropertyPredicate::And(predicates) => predicates.iter().all(|p| p.evaluate(aggregate)),
            PropertyPredicate::Or(predicates) => predicates.iter().any(|p| p.evaluate(aggregate)),
            PropertyPredicate::Not(predicate) => !predicate.evaluate(aggregate),
        }
    }
}

/// Parses `field=value` (equality) or `field!=value` (negated equality).
impl FromStr for PropertyPredicate {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s.split_once('=').ok_or_else(|| {
            QueryError::InvalidArgument(format!("Predicate must look like field=value: {}", s))
        })?;
        let (field, negated) = match field.strip_suffix('!') {
            Some(field) => (field, true),
            None => (field, false),
        };
        let field = StackVersionField::from_property(field.trim()).ok_or_else(|| {
            QueryError::InvalidArgument(format!("Unsupported property: {}", field.trim()))
        })?;
        let predicate = PropertyPredicate::equals(field, value.trim());
        Ok(if negated { predicate.negate() } else { predicate })
    }
}
