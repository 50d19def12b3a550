//! Request gate tests: bearer-token extraction, token verification, and the
//! role gate, exercised without a database.

use actix_web::http::{header, StatusCode};
use actix_web::{dev, test, web, App, HttpResponse};
use serde_json::json;

use taskvault::auth::{generate_token, AuthMiddleware, AuthenticatedUser, RequireRole};
use taskvault::models::Role;

const SECRET: &str = "gate-test-secret";

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "user_id": user.user_id,
        "role": user.role,
    }))
}

fn status_of<B>(result: Result<dev::ServiceResponse<B>, actix_web::Error>) -> StatusCode {
    match result {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    }
}

macro_rules! gate_app {
    () => {
        test::init_service(
            App::new()
                .service(
                    web::scope("/me")
                        .wrap(AuthMiddleware::new(SECRET))
                        .route("", web::get().to(whoami)),
                )
                .service(
                    // Wraps registered later run first: authentication
                    // precedes the role gate, as in the server composition.
                    web::scope("/admin")
                        .wrap(RequireRole::admin())
                        .wrap(AuthMiddleware::new(SECRET))
                        .route("/ping", web::get().to(HttpResponse::Ok)),
                ),
        )
        .await
    };
}

fn user_token() -> String {
    generate_token(42, Role::User, SECRET, chrono::Duration::seconds(900)).unwrap()
}

fn admin_token() -> String {
    generate_token(7, Role::Admin, SECRET, chrono::Duration::seconds(900)).unwrap()
}

#[actix_rt::test]
async fn test_missing_authorization_header_is_401() {
    let app = gate_app!();

    let req = test::TestRequest::get().uri("/me").to_request();
    let result = test::try_call_service(&app, req).await;
    assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_malformed_authorization_header_is_401() {
    let app = gate_app!();

    for value in [
        "Token abc",                   // wrong scheme
        "Bearer",                      // no token part
        "Bearer abc def",              // too many parts
        user_token().as_str(),         // bare token, no scheme
    ] {
        let req = test::TestRequest::get()
            .uri("/me")
            .append_header((header::AUTHORIZATION, value))
            .to_request();
        let result = test::try_call_service(&app, req).await;
        assert_eq!(
            status_of(result),
            StatusCode::UNAUTHORIZED,
            "header {:?} should be rejected",
            value
        );
    }
}

#[actix_rt::test]
async fn test_valid_token_attaches_identity() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/me")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", user_token())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["role"], "user");
}

#[actix_rt::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/me")
        .append_header((header::AUTHORIZATION, format!("bearer {}", user_token())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_expired_token_is_401() {
    let app = gate_app!();

    // Expired well past the verifier's leeway.
    let expired = generate_token(42, Role::User, SECRET, chrono::Duration::hours(-2)).unwrap();
    let req = test::TestRequest::get()
        .uri("/me")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
        .to_request();
    let result = test::try_call_service(&app, req).await;
    assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_garbage_and_wrong_secret_tokens_are_401() {
    let app = gate_app!();

    let foreign =
        generate_token(42, Role::User, "another-secret", chrono::Duration::seconds(900)).unwrap();

    for token in ["not-a-jwt".to_string(), foreign] {
        let req = test::TestRequest::get()
            .uri("/me")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let result = test::try_call_service(&app, req).await;
        assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_user_token_on_admin_route_is_403_naming_role() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/ping")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", user_token())))
        .to_request();

    match test::try_call_service(&app, req).await {
        Ok(resp) => {
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["error"]
                .as_str()
                .unwrap()
                .contains("admin role required"));
        }
        Err(err) => {
            let resp = err.error_response();
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert!(body["error"]
                .as_str()
                .unwrap()
                .contains("admin role required"));
        }
    }
}

#[actix_rt::test]
async fn test_admin_token_passes_role_gate() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/ping")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_admin_route_without_token_is_401_not_403() {
    let app = gate_app!();

    let req = test::TestRequest::get().uri("/admin/ping").to_request();
    let result = test::try_call_service(&app, req).await;
    assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
}
