use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

use crate::auth::token::generate_token;
use crate::auth::{LoginRequest, RegisterRequest};
use crate::config::Config;
use crate::error::AppError;
use crate::services::auth as auth_service;

/// Register a new user.
///
/// Creates an account with role `user` and returns the public user object.
pub async fn register(
    pool: web::Data<PgPool>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = auth_service::register(&pool, &body.email, &body.password).await?;

    log::info!("new user registered: {}", user.email);

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": user
    })))
}

/// Login and receive a bearer token.
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = match auth_service::login(&pool, &body.email, &body.password).await {
        Ok(user) => user,
        Err(err) => {
            log::warn!("failed login attempt for email: {}", body.email);
            return Err(err);
        }
    };

    let token = generate_token(
        user.id,
        user.role,
        &config.jwt_secret,
        chrono::Duration::seconds(config.jwt_ttl_secs),
    )?;

    log::info!("user login successful: {}", user.email);

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": user
    })))
}
