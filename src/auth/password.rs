use crate::error::AppError;
use bcrypt::{hash, verify};

/// Cost factor 12; each call salts freshly, so hashing the same password
/// twice yields different digests.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, 12)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Constant-time verification. A malformed digest is treated as a mismatch
/// rather than an error so callers never branch on digest shape.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}
