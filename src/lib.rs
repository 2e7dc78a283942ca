//! Stackstate: Cluster Stack Version Rollout State
//!
//! Read-side aggregation of a versioned software stack's rollout across the
//! nodes of a managed cluster. Resolves cluster version entries from lookup
//! criteria, buckets every associated node by lifecycle state, and projects
//! the requested fields.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;
pub mod types;
