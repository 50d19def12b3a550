pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse};
use serde_json::json;

/// Fallback for any path no route claims.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Resource not found"
    }))
}

/// Fallback for a matched path hit with an unsupported method.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({
        "error": "Method not allowed"
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register")
            .route(web::post().to(auth::register))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/login")
            .route(web::post().to(auth::login))
            .default_service(web::route().to(method_not_allowed)),
    );
}

pub fn task_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(tasks::list_tasks))
            .route(web::post().to(tasks::create_task))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(tasks::get_task))
            .route(web::put().to(tasks::update_task))
            .route(web::delete().to(tasks::delete_task))
            .default_service(web::route().to(method_not_allowed)),
    );
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tasks")
            .route(web::get().to(admin::list_all_tasks))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/tasks/{id}")
            .route(web::delete().to(admin::delete_any_task))
            .default_service(web::route().to(method_not_allowed)),
    );
}
