use crate::error::AppError;
use crate::models::Role;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: i32,
    /// Role carried so gated routes need no database lookup.
    pub role: Role,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Generates an HS256-signed token for a user.
///
/// The secret and lifetime come from configuration; nothing here reads the
/// environment.
pub fn generate_token(
    user_id: i32,
    role: Role,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry and decodes its claims.
///
/// Malformed, bad-signature, and expired tokens all yield the same generic
/// `AppError::Authentication`; the distinction is only logged.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    // No expiry leeway: a token is rejected the moment it expires.
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => log::debug!("rejected expired token"),
            kind => log::debug!("rejected invalid token: {:?}", kind),
        }
        AppError::Authentication("Invalid or expired token".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_generation_and_verification() {
        let token =
            generate_token(1, Role::User, SECRET, chrono::Duration::seconds(900)).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_carries_admin_role() {
        let token =
            generate_token(7, Role::Admin, SECRET, chrono::Duration::seconds(900)).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Expired two hours ago, well past jsonwebtoken's default leeway.
        let token =
            generate_token(2, Role::User, SECRET, chrono::Duration::hours(-2)).unwrap();
        match verify_token(&token, SECRET) {
            Err(AppError::Authentication(msg)) => {
                assert_eq!(msg, "Invalid or expired token");
            }
            Ok(_) => panic!("Token should have been rejected as expired"),
            Err(e) => panic!("Unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            generate_token(3, Role::User, SECRET, chrono::Duration::seconds(900)).unwrap();
        assert!(matches!(
            verify_token(&token, "a-completely-different-secret"),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not-a-jwt", SECRET),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            verify_token("", SECRET),
            Err(AppError::Authentication(_))
        ));
    }
}
