use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";

/// Looks up a user by email. Callers lower-case the email first; storage is
/// always lower-cased, which makes uniqueness case-insensitive.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn insert(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
