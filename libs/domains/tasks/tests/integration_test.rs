//! Integration tests for Tasks domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Database queries work correctly
//! - The primary key constraint is enforced
//! - Concurrent operations are handled properly

use domain_tasks::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_insert_and_get_task() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("insert_and_get");

    let input = CreateTask {
        id: builder.task_id(0),
        title: builder.title("task", "main"),
        is_completed: false,
    };

    let created = repo.insert(input.clone()).await.unwrap();
    assert_eq!(created.id, input.id);
    assert_eq!(created.title, input.title);
    assert!(!created.is_completed);

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "task should exist");
    assert_eq!(retrieved, created);
}

#[tokio::test]
async fn test_get_missing_task_returns_none() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("get_missing");

    let result = repo.get_by_id(builder.task_id(0)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_duplicate_id_hits_primary_key_constraint() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("duplicate_id");

    let id = builder.task_id(0);

    repo.insert(CreateTask {
        id,
        title: builder.title("task", "first"),
        is_completed: false,
    })
    .await
    .unwrap();

    let result = repo
        .insert(CreateTask {
            id,
            title: builder.title("task", "second"),
            is_completed: true,
        })
        .await;

    assert!(
        matches!(result, Err(TaskError::AlreadyExists(conflict_id)) if conflict_id == id),
        "Expected AlreadyExists error, got {:?}",
        result
    );

    // The stored task is untouched by the failed insert
    let stored = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.title, builder.title("task", "first"));
    assert!(!stored.is_completed);
}

#[tokio::test]
async fn test_list_all_ordered_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_ordered");

    for offset in [2, 0, 1] {
        repo.insert(CreateTask {
            id: builder.task_id(offset),
            title: builder.title("task", &format!("t{}", offset)),
            is_completed: false,
        })
        .await
        .unwrap();
    }

    let tasks = repo.list_all().await.unwrap();
    assert_eq!(tasks.len(), 3);

    let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "listing should be ordered by id");

    // Listing is read-only: a second call returns the same result
    let again = repo.list_all().await.unwrap();
    assert_eq!(tasks, again);
}

#[tokio::test]
async fn test_concurrent_inserts_same_id_exactly_one_wins() {
    let db = TestDatabase::new().await;
    let repo = Arc::new(PgTaskRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("concurrent_same_id");

    let id = builder.task_id(0);

    let handles: Vec<_> = (0..5)
        .map(|n| {
            let repo = repo.clone();
            let title = builder.title("task", &format!("racer-{}", n));
            tokio::spawn(async move {
                repo.insert(CreateTask {
                    id,
                    title,
                    is_completed: false,
                })
                .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(TaskError::AlreadyExists(conflict_id)) => {
                assert_eq!(conflict_id, id);
                conflicts += 1;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1, "exactly one insert should win");
    assert_eq!(conflicts, 4);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

// ============================================================================
// Service Tests (against real database)
// ============================================================================

#[tokio::test]
async fn test_service_round_trip() {
    let db = TestDatabase::new().await;
    let service = TaskService::new(PgTaskRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_round_trip");

    let created = service
        .create_task(CreateTask {
            id: builder.task_id(0),
            title: builder.title("task", "main"),
            is_completed: true,
        })
        .await
        .unwrap();

    let fetched = service.get_task(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let missing = service.get_task(builder.task_id(99)).await;
    assert!(matches!(missing, Err(TaskError::NotFound(_))));
}

#[tokio::test]
async fn test_service_validation_short_circuits_before_database() {
    let db = TestDatabase::new().await;
    let service = TaskService::new(PgTaskRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_validation");

    let result = service
        .create_task(CreateTask {
            id: builder.task_id(0),
            title: String::new(),
            is_completed: false,
        })
        .await;
    assert!(matches!(result, Err(TaskError::Validation(_))));

    // Nothing was stored
    assert!(service.list_tasks().await.unwrap().is_empty());
}
