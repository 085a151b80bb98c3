use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task};

/// Repository trait for Task persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task, rejecting duplicate ids
    async fn insert(&self, input: CreateTask) -> TaskResult<Task>;

    /// List all tasks
    async fn list_all(&self) -> TaskResult<Vec<Task>>;

    /// Get a task by ID
    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>>;
}

/// In-memory implementation of TaskRepository (for development/testing)
///
/// A `BTreeMap` keeps listing order stable by id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<BTreeMap<i32, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, input: CreateTask) -> TaskResult<Task> {
        // The write lock is held across the existence check and the insert,
        // so two concurrent inserts of the same id cannot both succeed.
        let mut tasks = self.tasks.write().await;

        if tasks.contains_key(&input.id) {
            return Err(TaskError::AlreadyExists(input.id));
        }

        let task = Task::new(input);
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = task.id, "Created task");
        Ok(task)
    }

    async fn list_all(&self) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_input(id: i32, title: &str) -> CreateTask {
        CreateTask {
            id,
            title: title.to_string(),
            is_completed: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryTaskRepository::new();

        let created = repo.insert(task_input(1, "write report")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.title, "write report");
        assert!(!created.is_completed);

        let fetched = repo.get_by_id(1).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryTaskRepository::new();
        assert_eq!(repo.get_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected_and_original_kept() {
        let repo = InMemoryTaskRepository::new();

        repo.insert(task_input(1, "first")).await.unwrap();
        let err = repo.insert(task_input(1, "second")).await.unwrap_err();
        assert!(matches!(err, TaskError::AlreadyExists(1)));

        // The stored task is untouched by the failed insert
        let stored = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.title, "first");
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_id() {
        let repo = InMemoryTaskRepository::new();

        repo.insert(task_input(3, "c")).await.unwrap();
        repo.insert(task_input(1, "a")).await.unwrap();
        repo.insert(task_input(2, "b")).await.unwrap();

        let tasks = repo.list_all().await.unwrap();
        let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_same_id_exactly_one_wins() {
        let repo = InMemoryTaskRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|n| {
                let repo = repo.clone();
                tokio::spawn(
                    async move { repo.insert(task_input(1, &format!("task-{}", n))).await },
                )
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(TaskError::AlreadyExists(1)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 9);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
