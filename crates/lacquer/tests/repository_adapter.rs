//! End-to-end coverage of repository definition and adapter dispatch.

use std::convert::Infallible;
use std::error::Error as _;
use std::fmt;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use lacquer::params::NewInstanceProvider;
use lacquer::query::QueryParams;
use lacquer::repository::{
    Entity, Extra, Id, Ids, Operation, Query, RepositoryAdapter, ResourceRepository,
};
use lacquer::RepositoryError;

#[derive(Debug, Clone, PartialEq)]
struct Project {
    id: Option<u64>,
    name: String,
}

fn project() -> Project {
    Project {
        id: None,
        name: "alpha".to_owned(),
    }
}

fn provider() -> NewInstanceProvider {
    NewInstanceProvider::new().register::<String>()
}

fn query() -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("filter[name]", "alpha");
    params
}

#[derive(Debug)]
struct BackendError(&'static str);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend failed: {}", self.0)
    }
}

impl std::error::Error for BackendError {}

fn assert_absent(err: RepositoryError, operation: Operation) {
    match err {
        RepositoryError::CapabilityAbsent {
            operation: op,
            resource_type,
        } => {
            assert_eq!(op, operation);
            assert_eq!(resource_type, "projects");
        }
        other => panic!("expected CapabilityAbsent, got {other:?}"),
    }
}

fn assert_malformed(err: RepositoryError, operation: Operation) {
    match err {
        RepositoryError::MalformedMethod {
            operation: op,
            resource_type,
            ..
        } => {
            assert_eq!(op, operation);
            assert_eq!(resource_type, "projects");
        }
        other => panic!("expected MalformedMethod, got {other:?}"),
    }
}

#[test]
fn missing_operations_fail_with_capability_absent() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());
    let query = QueryParams::new();

    assert_absent(adapter.find_one(1, &query).unwrap_err(), Operation::FindOne);
    assert_absent(adapter.find_all(&query).unwrap_err(), Operation::FindAll);
    assert_absent(
        adapter.find_all_with_ids(vec![1], &query).unwrap_err(),
        Operation::FindAllWithIds,
    );
    assert_absent(adapter.save(project()).unwrap_err(), Operation::Save);
    assert_absent(adapter.delete(1, &query).unwrap_err(), Operation::Delete);
}

#[test]
fn zero_parameter_methods_are_malformed() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_one(|| Ok::<Project, Infallible>(project()))
        .find_all_with_ids(|| Ok::<Vec<Project>, Infallible>(Vec::new()))
        .save(|| Ok::<Project, Infallible>(project()))
        .delete(|| Ok::<(), Infallible>(()))
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());
    let query = QueryParams::new();

    assert_malformed(adapter.find_one(1, &query).unwrap_err(), Operation::FindOne);
    assert_malformed(
        adapter.find_all_with_ids(vec![1], &query).unwrap_err(),
        Operation::FindAllWithIds,
    );
    assert_malformed(adapter.save(project()).unwrap_err(), Operation::Save);
    assert_malformed(adapter.delete(1, &query).unwrap_err(), Operation::Delete);
}

#[test]
fn zero_parameter_find_all_is_allowed() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_all(|| Ok::<Vec<Project>, Infallible>(vec![project()]))
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let found = adapter.find_all(&QueryParams::new()).unwrap();
    assert_eq!(found, vec![project()]);
}

#[test]
fn find_one_maps_id_query_and_extras_onto_the_method() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_one(
            move |Id(id): Id<u64>, Query(params): Query, Extra(token): Extra<String>| {
                recorded.lock().unwrap().push((id, params, token));
                Ok::<Project, Infallible>(Project {
                    id: Some(id),
                    name: "alpha".to_owned(),
                })
            },
        )
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let found = adapter.find_one(1, &query()).unwrap();

    assert_eq!(found.id, Some(1));
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[(1, query(), String::new())]
    );
}

#[test]
fn find_all_passes_query_through_verbatim() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_all(move |Query(params): Query, Extra(token): Extra<String>| {
            recorded.lock().unwrap().push((params, token));
            Ok::<Vec<Project>, Infallible>(vec![Project {
                id: Some(1),
                name: "alpha".to_owned(),
            }])
        })
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let found = adapter.find_all(&query()).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(1));
    assert_eq!(calls.lock().unwrap().as_slice(), &[(query(), String::new())]);
}

#[test]
fn find_all_with_ids_maps_the_collection_first() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_all_with_ids(
            move |Ids(ids): Ids<u64>, Query(params): Query, Extra(token): Extra<String>| {
                recorded.lock().unwrap().push((ids.clone(), params, token));
                Ok::<Vec<Project>, Infallible>(
                    ids.into_iter()
                        .map(|id| Project {
                            id: Some(id),
                            name: "alpha".to_owned(),
                        })
                        .collect(),
                )
            },
        )
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let found = adapter.find_all_with_ids(vec![1], &query()).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(1));
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[(vec![1], query(), String::new())]
    );
}

#[test]
fn save_returns_the_entity_as_mutated_by_the_method() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .save(
            |Entity(mut entity): Entity<Project>, Extra(_token): Extra<String>| {
                entity.id = Some(1);
                Ok::<Project, Infallible>(entity)
            },
        )
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let saved = adapter.save(project()).unwrap();

    assert_eq!(saved.id, Some(1));
    assert_eq!(saved.name, "alpha");
}

#[test]
fn delete_invokes_the_method_once_with_the_resolved_extra() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .delete(move |Id(id): Id<u64>, Extra(token): Extra<String>| {
            recorded.lock().unwrap().push((id, token));
            Ok::<(), Infallible>(())
        })
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    adapter.delete(1, &QueryParams::new()).unwrap();

    assert_eq!(calls.lock().unwrap().as_slice(), &[(1, String::new())]);
}

#[test]
fn duplicate_registration_is_rejected_at_construction() {
    let err = ResourceRepository::<Project, u64>::builder("projects")
        .delete(|Id(_id): Id<u64>| Ok::<(), Infallible>(()))
        .delete(|Id(_id): Id<u64>| Ok::<(), Infallible>(()))
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::DuplicateOperation {
            operation: Operation::Delete,
            resource_type: "projects",
        }
    ));
}

#[test]
fn misordered_parameters_are_malformed() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_one(|Query(_params): Query, Id(id): Id<u64>| {
            Ok::<Project, Infallible>(Project {
                id: Some(id),
                name: "alpha".to_owned(),
            })
        })
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    assert_malformed(
        adapter.find_one(1, &QueryParams::new()).unwrap_err(),
        Operation::FindOne,
    );
}

#[test]
fn unresolvable_extra_parameter_surfaces_as_parameter_error() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .delete(|Id(_id): Id<u64>, Extra(_token): Extra<String>| Ok::<(), Infallible>(()))
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, NewInstanceProvider::new());

    let err = adapter.delete(1, &QueryParams::new()).unwrap_err();
    assert!(matches!(err, RepositoryError::Parameter(_)));
}

#[test]
fn method_failures_preserve_the_original_cause() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_one(|Id(_id): Id<u64>| Err::<Project, BackendError>(BackendError("connection lost")))
        .build()
        .unwrap();
    let adapter = RepositoryAdapter::new(repository, provider());

    let err = adapter.find_one(1, &QueryParams::new()).unwrap_err();
    let RepositoryError::Invocation { operation, .. } = &err else {
        panic!("expected Invocation, got {err:?}");
    };
    assert_eq!(*operation, Operation::FindOne);

    let cause = err
        .source()
        .and_then(|source| source.downcast_ref::<BackendError>())
        .expect("original cause should be preserved");
    assert_eq!(cause.0, "connection lost");
}

#[test]
fn supports_reports_registered_capabilities() {
    let repository = ResourceRepository::<Project, u64>::builder("projects")
        .find_one(|Id(id): Id<u64>| {
            Ok::<Project, Infallible>(Project {
                id: Some(id),
                name: "alpha".to_owned(),
            })
        })
        .build()
        .unwrap();

    assert!(repository.supports(Operation::FindOne));
    assert!(!repository.supports(Operation::FindAll));
    assert!(!repository.supports(Operation::Save));
    assert_eq!(repository.resource_type(), "projects");
}
