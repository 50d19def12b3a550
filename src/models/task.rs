use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Lifecycle state of a task. Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl FromStr for TaskStatus {
    type Err = ();

    // Case-sensitive: only the exact enum literals are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

/// A task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Owning user. Never changes after creation.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. `status` arrives as a raw string so the
/// service can validate it and answer with a field-specific message rather
/// than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Payload for a partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Pagination query parameters.
///
/// Captured as raw strings: out-of-range and non-numeric values silently
/// fall back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Resolves to `(page, limit)` with page >= 1 and 1 <= limit <= 100;
    /// anything else becomes page 1 / limit 10.
    pub fn clamp(&self) -> (i64, i64) {
        let page = match self.page.as_deref().and_then(|p| p.parse::<i64>().ok()) {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let limit = match self.limit.as_deref().and_then(|l| l.parse::<i64>().ok()) {
            Some(l) if (1..=100).contains(&l) => l,
            _ => 10,
        };
        (page, limit)
    }
}

/// One page of task listings together with the pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl TaskPage {
    pub fn new(tasks: Vec<Task>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            tasks,
            total,
            page,
            limit,
            // Ceiling division
            total_pages: (total + limit - 1) / limit,
        }
    }
}
