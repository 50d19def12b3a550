use sqlx::PgPool;

use crate::cache::{ListCache, Scope};
use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, TaskPage, TaskStatus, UpdateTaskRequest};
use crate::repo::tasks::{self, TaskChanges};
use crate::security::{sanitize_input, validate_task_status, validate_task_title};

/// Creates a task for the authenticated user. Free-text fields are
/// sanitized before validation; a description that sanitizes to empty is
/// stored as NULL.
pub async fn create_task(
    pool: &PgPool,
    cache: &ListCache,
    user_id: i32,
    input: CreateTaskRequest,
) -> Result<Task, AppError> {
    let title = sanitize_input(&input.title);
    validate_task_title(&title)?;

    let description = input
        .description
        .as_deref()
        .map(sanitize_input)
        .filter(|d| !d.is_empty());

    let status = match input.status.as_deref() {
        Some(status) => validate_task_status(status)?,
        None => TaskStatus::Pending,
    };

    let task = tasks::create(pool, user_id, &title, description.as_deref(), status).await?;
    cache.invalidate_user(user_id);
    Ok(task)
}

/// One page of the user's tasks, served from the list cache when fresh.
pub async fn list_tasks(
    pool: &PgPool,
    cache: &ListCache,
    user_id: i32,
    page: i64,
    limit: i64,
) -> Result<TaskPage, AppError> {
    let scope = Scope::User(user_id);
    if let Some(cached) = cache.get(scope, page, limit) {
        return Ok(cached);
    }

    let (items, total) = tasks::list_for_user(pool, user_id, page, limit).await?;
    let result = TaskPage::new(items, total, page, limit);
    cache.insert(scope, page, limit, result.clone());
    Ok(result)
}

pub async fn get_task(pool: &PgPool, user_id: i32, task_id: i32) -> Result<Task, AppError> {
    tasks::get_for_user(pool, task_id, user_id).await
}

/// Partial update: only supplied fields are touched, each sanitized and
/// re-validated before the merge.
pub async fn update_task(
    pool: &PgPool,
    cache: &ListCache,
    user_id: i32,
    task_id: i32,
    input: UpdateTaskRequest,
) -> Result<Task, AppError> {
    let mut changes = TaskChanges::default();

    if let Some(title) = input.title.as_deref() {
        let title = sanitize_input(title);
        validate_task_title(&title)?;
        changes.title = Some(title);
    }

    if let Some(description) = input.description.as_deref() {
        let description = sanitize_input(description);
        changes.description = Some(if description.is_empty() {
            None
        } else {
            Some(description)
        });
    }

    if let Some(status) = input.status.as_deref() {
        changes.status = Some(validate_task_status(status)?);
    }

    let task = tasks::update(pool, task_id, user_id, changes).await?;
    cache.invalidate_user(user_id);
    Ok(task)
}

pub async fn delete_task(
    pool: &PgPool,
    cache: &ListCache,
    user_id: i32,
    task_id: i32,
) -> Result<(), AppError> {
    tasks::delete_owned(pool, task_id, user_id).await?;
    cache.invalidate_user(user_id);
    Ok(())
}

/// Admin listing of every user's tasks. Role enforcement happens in the
/// request gate; this function trusts its caller.
pub async fn list_all_tasks(
    pool: &PgPool,
    cache: &ListCache,
    page: i64,
    limit: i64,
) -> Result<TaskPage, AppError> {
    if let Some(cached) = cache.get(Scope::AllTasks, page, limit) {
        return Ok(cached);
    }

    let (items, total) = tasks::list_all(pool, page, limit).await?;
    let result = TaskPage::new(items, total, page, limit);
    cache.insert(Scope::AllTasks, page, limit, result.clone());
    Ok(result)
}

/// Admin delete without ownership check. The owner is not resolved here, so
/// the whole cache is dropped.
pub async fn delete_any_task(
    pool: &PgPool,
    cache: &ListCache,
    task_id: i32,
) -> Result<(), AppError> {
    tasks::delete_any(pool, task_id).await?;
    cache.clear();
    Ok(())
}
