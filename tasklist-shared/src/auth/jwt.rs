/// Access token generation and validation
///
/// Tokens are HS256-signed JWTs carrying the user's identity and role. They
/// are stateless: nothing is stored server-side, and a token stays valid
/// until it expires.
///
/// # Claims
///
/// - `sub`: User ID (as a string, per RFC 7519)
/// - `username`, `role`: Identity used by handlers
/// - `iss`: Always "tasklist"
/// - `iat`, `nbf`, `exp`: Unix timestamps
/// - `jti`: Random token ID
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::{create_token, validate_token, Claims};
/// use tasklist_shared::models::user::Role;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes!!";
/// let claims = Claims::new(1, "johndoe", Role::User, Duration::minutes(20));
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.user_id()?, 1);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer written into and required from every token
pub const ISSUER: &str = "tasklist";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim check failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Subject is not a user ID
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: String,

    /// Username at issue time
    pub username: String,

    /// Role at issue time
    pub role: Role,

    /// Issuer - always "tasklist"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token ID
    pub jti: Uuid,
}

impl Claims {
    /// Creates claims that expire `ttl` from now
    ///
    /// A negative `ttl` yields already-expired claims, which is only useful
    /// in tests.
    pub fn new(user_id: i64, username: impl Into<String>, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            username: username.into(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}

/// Signs claims with HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, expiry, not-before and issuer, and returns the claims
///
/// Expiry is checked without leeway.
///
/// # Errors
///
/// - `JwtError::Expired` for an expired token
/// - `JwtError::InvalidIssuer` for a foreign issuer
/// - `JwtError::ValidationError` for a bad signature or malformed token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, "johndoe", Role::User, Duration::minutes(20));

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "johndoe");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 1200);
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(1, "admin", Role::Admin, Duration::minutes(20));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.user_id().unwrap(), 1);
        assert_eq!(validated.username, "admin");
        assert_eq!(validated.role, Role::Admin);
        assert_eq!(validated.jti, claims.jti);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, "johndoe", Role::User, Duration::minutes(20));
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::new(1, "johndoe", Role::User, Duration::seconds(-3600));
        assert!(claims.exp < claims.iat);

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let claims = Claims::new(2, "johndoe", Role::User, Duration::minutes(20));
        let token = create_token(&claims, SECRET).unwrap();

        // Swap in the payload of an admin token signed with another key
        let forged_claims = Claims::new(2, "johndoe", Role::Admin, Duration::minutes(20));
        let forged = create_token(&forged_claims, "attacker-secret-key-at-least-32-bytes").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(matches!(
            validate_token("not-a-jwt", SECRET),
            Err(JwtError::ValidationError(_))
        ));
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(1, "johndoe", Role::User, Duration::minutes(20));
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = Claims::new(1, "johndoe", Role::User, Duration::minutes(20));
        claims.sub = "johndoe".to_string();

        assert!(matches!(claims.user_id(), Err(JwtError::InvalidSubject(_))));
    }
}
