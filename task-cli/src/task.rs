use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single tracked item as it is persisted in the task file.
#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
pub struct Task {
    pub(crate) id: u32,
    pub(crate) description: String,
    pub(crate) status: Status,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub(crate) fn new(id: u32, description: String) -> Self {
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Absent until the description or status is changed for the first time.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    /// Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "in-progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_as_todo_without_update_time() {
        let task = Task::new(1, "Test task".to_string());

        assert_eq!(task.id(), 1);
        assert_eq!(task.description(), "Test task");
        assert_eq!(task.status(), Status::Todo);
        assert!(task.created_at() <= Utc::now());
        assert_eq!(task.updated_at(), None);
    }

    #[test]
    fn touch_sets_update_time_after_creation() {
        let mut task = Task::new(1, "Test task".to_string());

        task.touch();

        let updated_at = task.updated_at().unwrap();
        assert!(updated_at >= task.created_at());
    }

    mod status_tests {
        use super::*;

        #[test]
        fn parses_known_values() {
            assert_eq!("todo".parse::<Status>(), Ok(Status::Todo));
            assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
            assert_eq!("done".parse::<Status>(), Ok(Status::Done));
        }

        #[test]
        fn parsing_is_case_sensitive() {
            assert!("Done".parse::<Status>().is_err());
            assert!("TODO".parse::<Status>().is_err());
            assert!("in_progress".parse::<Status>().is_err());
        }

        #[test]
        fn rejects_empty_string() {
            assert_eq!(
                "".parse::<Status>(),
                Err(ParseStatusError(String::new()))
            );
        }

        #[test]
        fn display_matches_persisted_form() {
            for status in [Status::Todo, Status::InProgress, Status::Done] {
                let json = serde_json::to_string(&status).unwrap();
                assert_eq!(json, format!("\"{}\"", status));
            }
        }
    }

    #[test]
    fn test_task_deserialize_from_json() {
        // Arrange
        let json = r#"
        {
            "id": 7,
            "description": "Write report",
            "status": "in-progress",
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2023-01-02T10:30:00.123456789Z"
        }
        "#;

        // Act
        let task: Task = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(task.id, 7);
        assert_eq!(task.description, "Write report");
        assert_eq!(task.status, Status::InProgress);
        assert!(task.updated_at.unwrap() > task.created_at);
    }

    #[test]
    fn test_task_without_update_serializes_null() {
        let task = Task::new(3, "Fresh".to_string());

        let json = serde_json::to_string(&task).unwrap();

        assert!(json.contains("\"updated_at\":null"));
        assert!(json.contains("\"status\":\"todo\""));
    }
}
