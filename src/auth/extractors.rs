use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::Role;

/// The authenticated identity for the current request.
///
/// Reads the `Claims` that `AuthMiddleware` inserted into request
/// extensions. Handlers take this as a parameter instead of trusting any
/// client-supplied user id. On routes without the middleware the extraction
/// fails with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser {
                user_id: claims.sub,
                role: claims.role,
            })),
            None => {
                let err = AppError::Authentication("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
