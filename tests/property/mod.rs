//! Property-based tests for aggregation and resolution

mod resolution;
