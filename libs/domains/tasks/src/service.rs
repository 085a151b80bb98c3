use std::sync::Arc;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task with validation
    ///
    /// Validation happens before any persistence work, so an invalid request
    /// never reaches the repository. Duplicate-id arbitration is left to the
    /// repository, which can enforce it atomically.
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.insert(input).await
    }

    /// List all tasks
    pub async fn list_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.list_all().await
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i32) -> TaskResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }
}
