use actix_cors::Cors;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers, Logger};
use actix_web::{dev, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use taskvault::auth::{AuthMiddleware, RequireRole};
use taskvault::cache::ListCache;
use taskvault::config::Config;
use taskvault::error::AppError;
use taskvault::rate_limit::RateLimit;
use taskvault::routes;
use taskvault::services;

/// Replaces the body of any uncaught 500 with a uniform JSON envelope.
fn render_internal_error<B>(
    res: dev::ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let mut res = res.set_body(r#"{"error":"Internal server error"}"#.to_string());
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    let res = dev::ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    services::auth::ensure_admin(&pool, &config.admin_email, &config.admin_password)
        .await
        .expect("Failed to seed admin user");

    log::info!("Starting taskvault server at {}", config.server_url());

    let host = config.server_host.clone();
    let port = config.server_port;

    let pool_data = web::Data::new(pool);
    let cache_data = web::Data::new(ListCache::new(Duration::from_secs(config.cache_ttl_secs)));
    let config_data = web::Data::new(config.clone());
    // Shared across workers so the budget is per client, not per worker.
    let rate_limit = RateLimit::per_hour(config.rate_limit_per_hour);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(pool_data.clone())
            .app_data(cache_data.clone())
            .app_data(config_data.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid request body: {}", err)).into()
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::INTERNAL_SERVER_ERROR, render_internal_error),
            )
            .service(
                web::resource("/health")
                    .route(web::get().to(routes::health::health))
                    .default_service(web::route().to(routes::method_not_allowed)),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(rate_limit.clone())
                    .service(web::scope("/auth").configure(routes::auth_routes))
                    .service(
                        web::scope("/tasks")
                            .wrap(AuthMiddleware::new(config.jwt_secret.clone()))
                            .configure(routes::task_routes),
                    )
                    .service(
                        // Wraps registered later run first: authentication
                        // precedes the role gate.
                        web::scope("/admin")
                            .wrap(RequireRole::admin())
                            .wrap(AuthMiddleware::new(config.jwt_secret.clone()))
                            .configure(routes::admin_routes),
                    ),
            )
            .default_service(web::route().to(routes::not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
