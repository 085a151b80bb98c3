use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, SqlErr};

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{CreateTask, Task},
    repository::TaskRepository,
};

pub struct PgTaskRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, input: CreateTask) -> TaskResult<Task> {
        let id = input.id;
        let active_model: entity::ActiveModel = input.into();

        // No pre-check: the primary key constraint arbitrates duplicate ids,
        // so concurrent inserts of the same id resolve to exactly one winner.
        match self.base.insert(active_model).await {
            Ok(model) => {
                tracing::info!(task_id = model.id, "Created task");
                Ok(model.into())
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(TaskError::AlreadyExists(id)),
                _ => Err(TaskError::Internal(format!("Database error: {}", e))),
            },
        }
    }

    async fn list_all(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }
}
