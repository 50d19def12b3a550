use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::cache::ListCache;
use crate::error::AppError;
use crate::models::{CreateTaskRequest, PageQuery, UpdateTaskRequest};
use crate::services::tasks as task_service;

/// Create a task owned by the authenticated user.
///
/// `status` is optional and defaults to `pending`.
pub async fn create_task(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    user: AuthenticatedUser,
    body: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = task_service::create_task(&pool, &cache, user.user_id, body.into_inner()).await?;

    log::info!("task created: id {} by user {}", task.id, user.user_id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task
    })))
}

/// List the authenticated user's tasks with pagination.
///
/// Invalid `page`/`limit` values fall back to 1 and 10 rather than failing.
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = query.clamp();
    let result = task_service::list_tasks(&pool, &cache, user.user_id, page, limit).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Fetch one task by id. A task owned by someone else is a 404.
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = task_service::get_task(&pool, user.user_id, task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Partial update of an owned task; absent fields are left unchanged.
pub async fn update_task(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = task_service::update_task(
        &pool,
        &cache,
        user.user_id,
        task_id.into_inner(),
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task
    })))
}

/// Delete an owned task. Deleting an already-deleted id is a plain 404.
pub async fn delete_task(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    task_service::delete_task(&pool, &cache, user.user_id, task_id).await?;

    log::info!("task deleted: id {} by user {}", task_id, user.user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
