use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Task entity - a single tracked task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier, chosen by the caller at creation time
    pub id: i32,
    /// Short description of the task
    pub title: String,
    /// Whether the task has been completed
    pub is_completed: bool,
}

/// DTO for creating a new task
///
/// The id is caller-supplied; `is_completed` defaults to false when omitted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    pub id: i32,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Create a new task from a CreateTask DTO
    pub fn new(input: CreateTask) -> Self {
        Self {
            id: input.id,
            title: input.title,
            is_completed: input.is_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_valid() {
        let input = CreateTask {
            id: 1,
            title: "write report".to_string(),
            is_completed: false,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_task_empty_title_rejected() {
        let input = CreateTask {
            id: 1,
            title: String::new(),
            is_completed: false,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_is_completed_defaults_to_false() {
        let input: CreateTask = serde_json::from_str(r#"{"id": 7, "title": "buy milk"}"#).unwrap();
        assert!(!input.is_completed);
        assert_eq!(input.id, 7);
    }

    #[test]
    fn test_missing_id_is_a_deserialization_error() {
        let result: Result<CreateTask, _> = serde_json::from_str(r#"{"title": "buy milk"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_wire_format() {
        let task = Task {
            id: 1,
            title: "write report".to_string(),
            is_completed: true,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "write report", "is_completed": true})
        );
    }
}
