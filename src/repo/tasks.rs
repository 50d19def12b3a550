use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Task, TaskStatus};

const TASK_COLUMNS: &str = "id, title, description, status, user_id, created_at, updated_at";

/// Field changes for a partial update. `None` leaves a field untouched; for
/// the description, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

pub async fn create(
    pool: &PgPool,
    user_id: i32,
    title: &str,
    description: Option<&str>,
    status: TaskStatus,
) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, status, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// One page of the user's tasks, newest first, plus the unpaginated total.
/// `page` and `limit` arrive already clamped.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: i32,
    page: i64,
    limit: i64,
) -> Result<(Vec<Task>, i64), AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
        TASK_COLUMNS
    ))
    .bind(user_id)
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await?;

    Ok((tasks, total))
}

/// Fetches a task the user owns. A task belonging to someone else comes back
/// as the same not-found as a task that does not exist.
pub async fn get_for_user(pool: &PgPool, task_id: i32, user_id: i32) -> Result<Task, AppError> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found or access denied".into()))
}

/// Merges the supplied changes into an owned task and refreshes
/// `updated_at`. Fields are sanitized and validated by the service before
/// they get here.
pub async fn update(
    pool: &PgPool,
    task_id: i32,
    user_id: i32,
    changes: TaskChanges,
) -> Result<Task, AppError> {
    let current = get_for_user(pool, task_id, user_id).await?;

    let title = changes.title.unwrap_or(current.title);
    let description = changes.description.unwrap_or(current.description);
    let status = changes.status.unwrap_or(current.status);

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks
         SET title = $1, description = $2, status = $3, updated_at = now()
         WHERE id = $4 AND user_id = $5
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(task_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

pub async fn delete_owned(pool: &PgPool, task_id: i32, user_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found or access denied".into()));
    }
    Ok(())
}

/// Admin view: every user's tasks, newest first.
pub async fn list_all(pool: &PgPool, page: i64, limit: i64) -> Result<(Vec<Task>, i64), AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool)
        .await?;

    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2",
        TASK_COLUMNS
    ))
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await?;

    Ok((tasks, total))
}

/// Admin delete: no ownership filter.
pub async fn delete_any(pool: &PgPool, task_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(())
}
