use sqlx::PgPool;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Role, User};
use crate::repo::users;
use crate::security::{sanitize_input, validate_email, validate_password};

/// Registers a new user with role `user`.
///
/// The email is sanitized and lower-cased before validation and lookup, so
/// uniqueness is case-insensitive. All validation runs before any
/// persistence attempt.
pub async fn register(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    let email = sanitize_input(email).to_lowercase();

    validate_email(&email)?;
    validate_password(password)?;

    if users::find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let password_hash = hash_password(password)?;
    users::insert(pool, &email, &password_hash, Role::User).await
}

/// Authenticates a user by email and password.
///
/// An unknown email and a wrong password produce the exact same error so the
/// response never reveals which part failed.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    let email = sanitize_input(email).to_lowercase();

    let user = users::find_by_email(pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    Ok(user)
}

fn invalid_credentials() -> AppError {
    AppError::Authentication("Invalid email or password".into())
}

/// Creates the default admin account at startup if it does not exist yet,
/// so the admin surface is usable on a fresh database.
pub async fn ensure_admin(pool: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
    let email = email.to_lowercase();
    if users::find_by_email(pool, &email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)?;
    users::insert(pool, &email, &password_hash, Role::Admin).await?;
    log::info!("default admin user created: {}", email);
    Ok(())
}
