//! Stack version query: criteria resolution, state aggregation, projection.
//! The service is the single read entry point; nothing here writes.

pub mod aggregate;
pub mod criteria;
pub mod predicate;
pub mod projection;
pub mod resolver;
pub mod service;

pub use aggregate::{aggregate, empty_buckets, NodeBuckets, StackVersionAggregate};
pub use criteria::{CriteriaMap, StackVersionField};
pub use predicate::{Predicate, PropertyPredicate};
pub use projection::{filter_and_project, project, FieldSelection, Projection};
pub use resolver::resolve;
pub use service::{StackVersionRequest, StackVersionService};
