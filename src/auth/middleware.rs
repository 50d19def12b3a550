//! Request gate: bearer-token authentication and role gating.
//!
//! `AuthMiddleware` wraps protected scopes and turns a valid
//! `Authorization: Bearer <token>` header into `Claims` in request
//! extensions. `RequireRole` composes after it (registered closer to the
//! routes) and short-circuits with 403 when the attached role does not
//! match. Both are per-request, synchronous checks with no retry.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::token::{verify_token, Claims};
use crate::error::AppError;
use crate::models::Role;

pub struct AuthMiddleware {
    secret: Rc<String>,
}

impl AuthMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secret: Rc::clone(&self.secret),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let header_value = match header_value {
            Some(value) => value,
            None => {
                let err = AppError::Authentication("Missing authorization header".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        // The header must be exactly two parts: the bearer keyword and the
        // token itself.
        let parts: Vec<&str> = header_value.split_whitespace().collect();
        if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
            let err = AppError::Authentication(
                "Invalid authorization header format. Use: Bearer <token>".into(),
            );
            return Box::pin(async move { Err(err.into()) });
        }

        match verify_token(parts[1], &self.secret) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

/// Role gate for routes that require an elevated role. Must be composed
/// after `AuthMiddleware` so claims are already attached.
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let granted = req.extensions().get::<Claims>().map(|claims| claims.role);

        match granted {
            Some(role) if role == self.role => {
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Some(_) => {
                let err = AppError::Authorization(format!(
                    "Insufficient permissions. {} role required",
                    self.role
                ));
                Box::pin(async move { Err(err.into()) })
            }
            None => {
                let err = AppError::Authentication("Authentication required".into());
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}
