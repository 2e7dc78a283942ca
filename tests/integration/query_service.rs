//! End-to-end reads through StackVersionService over the memory store

use super::support::{node, populated_memory_store};
use serde_json::json;
use stackstate::error::QueryError;
use stackstate::query::criteria::{for_cluster, for_id};
use stackstate::query::{
    FieldSelection, Predicate, PropertyPredicate, StackVersionAggregate, StackVersionField,
    StackVersionRequest, StackVersionService,
};
use stackstate::store::{ClusterVersionDirectory, MemoryStore};
use stackstate::types::LifecycleState;
use std::sync::Arc;

fn service() -> (Arc<MemoryStore>, StackVersionService) {
    let store = populated_memory_store();
    let service = StackVersionService::from_store(store.clone());
    (store, service)
}

#[test]
fn test_single_id_lookup_buckets_nodes() {
    let (_store, service) = service();
    let aggregates = service.aggregates(&[for_id("c1", 1)]).unwrap();
    assert_eq!(aggregates.len(), 1);

    let aggregate = &aggregates[0];
    assert_eq!(aggregate.cluster_name, "c1");
    assert_eq!(aggregate.state, LifecycleState::Current);
    assert_eq!(aggregate.current_nodes(), ["h1", "h2"]);
    assert_eq!(aggregate.installed_nodes(), ["h3"]);
    assert!(aggregate.nodes_in(LifecycleState::Installing).is_empty());
    assert_eq!(aggregate.repositories.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_list_mode_matches_cluster_scan() {
    let (store, service) = service();
    let aggregates = service.aggregates(&[for_cluster("c1")]).unwrap();
    let mut ids: Vec<_> = aggregates.iter().map(|a| a.id).collect();
    ids.sort_unstable();

    let mut expected: Vec<_> = store
        .find_by_cluster("c1")
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    expected.sort_unstable();
    assert_eq!(ids, expected);
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_list_mode_for_unknown_cluster_is_empty() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_cluster("nope")]);
    assert!(service.get_resources(&request, None).unwrap().is_empty());
}

#[test]
fn test_version_without_catalog_entry_omits_repositories() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_id("c1", 2)]);
    let projections = service.get_resources(&request, None).unwrap();
    assert_eq!(projections.len(), 1);
    assert!(!projections[0].contains(StackVersionField::Repositories));
    assert_eq!(
        projections[0].get(StackVersionField::NodeStates),
        Some(&json!({
            "INSTALLING": ["h1"],
            "INSTALLED": [],
            "CURRENT": [],
            "INSTALL_FAILED": ["h2"],
            "OUT_OF_SYNC": []
        }))
    );
}

#[test]
fn test_non_numeric_id_is_invalid_argument() {
    let (_store, service) = service();
    let mut criteria = for_cluster("c1");
    criteria.insert("id".to_string(), json!("abc"));
    let err = service
        .get_resources(&StackVersionRequest::new(vec![criteria]), None)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgument(_)));
}

#[test]
fn test_missing_id_is_not_found() {
    let (_store, service) = service();
    let err = service.aggregates(&[for_id("c1", 999999)]).unwrap_err();
    assert!(matches!(err, QueryError::NotFound(999999)));
    assert!(err.to_string().contains("999999"));
}

#[test]
fn test_one_missing_id_fails_whole_batch() {
    let (_store, service) = service();
    let err = service
        .aggregates(&[for_id("c1", 1), for_id("c1", 42)])
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound(42)));
}

#[test]
fn test_batched_no_id_map_is_rejected() {
    let (_store, service) = service();
    let err = service
        .aggregates(&[for_cluster("c1"), for_id("c1", 1)])
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgument(_)));
}

#[test]
fn test_repeated_ids_are_not_deduplicated() {
    let (_store, service) = service();
    let aggregates = service
        .aggregates(&[for_id("c1", 1), for_id("c1", 1)])
        .unwrap();
    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[0], aggregates[1]);
}

#[test]
fn test_state_only_projection_with_cluster_predicate() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_cluster("c1")])
        .with_fields(FieldSelection::only([StackVersionField::State]));

    let on_c1 = PropertyPredicate::equals(StackVersionField::ClusterName, "c1");
    let projections = service.get_resources(&request, Some(&on_c1)).unwrap();
    assert_eq!(projections.len(), 2);
    for projection in &projections {
        assert_eq!(projection.len(), 1);
        assert!(projection.contains(StackVersionField::State));
        assert!(!projection.contains(StackVersionField::ClusterName));
    }

    let on_c2 = PropertyPredicate::equals(StackVersionField::ClusterName, "c2");
    assert!(service.get_resources(&request, Some(&on_c2)).unwrap().is_empty());
}

#[test]
fn test_closure_predicate() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_cluster("c1")])
        .with_fields(FieldSelection::only([StackVersionField::Id]));
    let has_failures = |aggregate: &StackVersionAggregate| {
        !aggregate.nodes_in(LifecycleState::InstallFailed).is_empty()
    };
    let projections = service
        .get_resources(&request, Some(&has_failures as &dyn Predicate))
        .unwrap();
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].get(StackVersionField::Id), Some(&json!(2)));
}

#[test]
fn test_reads_reflect_ledger_mutations() {
    let (store, service) = service();
    let before = service.aggregates(&[for_id("c1", 1)]).unwrap();

    store.put_node_version(node("h4", "c1", "2.2.0.0", LifecycleState::Installing));
    assert!(store.set_node_state("h3", "c1", "HDP-2.2", "2.2.0.0", LifecycleState::Current));

    let after = service.aggregates(&[for_id("c1", 1)]).unwrap();
    assert_ne!(before, after);
    assert_eq!(after[0].current_nodes(), ["h1", "h2", "h3"]);
    assert_eq!(after[0].nodes_in(LifecycleState::Installing), ["h4"]);
    assert!(after[0].installed_nodes().is_empty());
}

#[test]
fn test_identical_reads_are_idempotent() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_cluster("c1")]);
    let first = service.get_resources(&request, None).unwrap();
    let second = service.get_resources(&request, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_mutations_are_unsupported() {
    let (_store, service) = service();
    let request = StackVersionRequest::new(vec![for_id("c1", 1)]);
    let anything = PropertyPredicate::equals(StackVersionField::Id, 1);

    assert!(matches!(
        service.create_resources(&request),
        Err(QueryError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        service.update_resources(&request, Some(&anything)),
        Err(QueryError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        service.delete_resources(None),
        Err(QueryError::UnsupportedOperation(_))
    ));
    // Nothing changed.
    assert_eq!(service.aggregates(&[for_id("c1", 1)]).unwrap()[0].node_count(), 3);
}
