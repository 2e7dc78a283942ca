//! Integration tests for stack version state aggregation

mod concurrency;
mod query_service;
mod support;
