pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::{AuthMiddleware, RequireRole};
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Payload for a user login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for a new user registration request. Field constraints are
/// enforced by `security` after sanitization, not at deserialization time.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}
