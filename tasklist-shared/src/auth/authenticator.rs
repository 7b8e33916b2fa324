/// Credential verification and token issuance
///
/// ```text
/// username + password ─► find user ─► verify hash ─► active? ─► sign token
/// ```
///
/// Every failure on the credential path collapses into
/// [`AuthnError::InvalidCredentials`] or [`AuthnError::Inactive`], so
/// callers cannot tell an unknown username from a wrong password.

use chrono::Duration;
use tracing::{debug, warn};

use super::{
    jwt::{self, Claims, JwtError},
    password::{self, PasswordError},
};
use crate::{
    models::user::User,
    store::{StoreError, UserStore},
};

/// Error type for credential checks
#[derive(Debug, thiserror::Error)]
pub enum AuthnError {
    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// User exists but has been deactivated
    #[error("User account is inactive")]
    Inactive,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Token handed back after a successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub claims: Claims,
}

/// Checks a username/password pair against the credential store
///
/// # Errors
///
/// - [`AuthnError::InvalidCredentials`] for an unknown user or wrong password
/// - [`AuthnError::Inactive`] for a deactivated user with the right password
pub async fn verify_credentials<S>(store: &S, username: &str, password: &str) -> Result<User, AuthnError>
where
    S: UserStore + ?Sized,
{
    let Some(user) = store.find_user_by_username(username).await? else {
        password::spawn_verify_against_dummy(password).await;
        debug!(username, "Login attempt for unknown user");
        return Err(AuthnError::InvalidCredentials);
    };

    if !password::spawn_verify_password(password, &user.hashed_password).await? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(AuthnError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = user.id, "Login attempt for inactive user");
        return Err(AuthnError::Inactive);
    }

    Ok(user)
}

/// Signs an access token for `user` valid for `ttl`
pub fn issue_token(user: &User, secret: &str, ttl: Duration) -> Result<IssuedToken, JwtError> {
    let claims = Claims::new(user.id, user.username.clone(), user.role, ttl);
    let access_token = jwt::create_token(&claims, secret)?;

    Ok(IssuedToken {
        access_token,
        claims,
    })
}

/// Verifies credentials and issues a token in one step
pub async fn authenticate<S>(
    store: &S,
    username: &str,
    password: &str,
    secret: &str,
    ttl: Duration,
) -> Result<IssuedToken, AuthnError>
where
    S: UserStore + ?Sized,
{
    let user = verify_credentials(store, username, password).await?;
    let token = issue_token(&user, secret, ttl)?;

    debug!(user_id = user.id, role = %user.role, "Issued access token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::jwt::validate_token,
        models::user::{CreateUser, Role},
        store::MemoryStore,
    };

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    async fn store_with_user(username: &str, password: &str, role: Role) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                hashed_password: password::hash_password(password).unwrap(),
                role,
            })
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let (store, user) = store_with_user("johndoe", "secret-pass", Role::Admin).await;

        let issued = authenticate(&store, "johndoe", "secret-pass", SECRET, Duration::minutes(20))
            .await
            .unwrap();

        let claims = validate_token(&issued.access_token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.username, "johndoe");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (store, _) = store_with_user("johndoe", "secret-pass", Role::User).await;

        let result = verify_credentials(&store, "johndoe", "wrong-pass").await;
        assert!(matches!(result, Err(AuthnError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (store, _) = store_with_user("johndoe", "secret-pass", Role::User).await;

        let result = verify_credentials(&store, "nobody", "secret-pass").await;
        assert!(matches!(result, Err(AuthnError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_inactive_user() {
        let (store, user) = store_with_user("johndoe", "secret-pass", Role::User).await;
        store.set_user_active(user.id, false).await.unwrap();

        let result = verify_credentials(&store, "johndoe", "secret-pass").await;
        assert!(matches!(result, Err(AuthnError::Inactive)));
    }
}
