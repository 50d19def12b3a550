//! Admin-only endpoints. These handlers are reachable only through the
//! `RequireRole::admin()` gate; the services below do no role checks of
//! their own.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::cache::ListCache;
use crate::error::AppError;
use crate::models::PageQuery;
use crate::services::tasks as task_service;

/// List every user's tasks with pagination.
pub async fn list_all_tasks(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    _user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = query.clamp();
    let result = task_service::list_all_tasks(&pool, &cache, page, limit).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Delete any task regardless of owner.
pub async fn delete_any_task(
    pool: web::Data<PgPool>,
    cache: web::Data<ListCache>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    task_service::delete_any_task(&pool, &cache, task_id).await?;

    log::info!("task deleted: id {} by admin {}", task_id, user.user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
