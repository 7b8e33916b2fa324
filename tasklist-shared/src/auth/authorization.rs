/// Role checks
///
/// Two tiers: `admin` may list and delete every task, `user` only touches
/// its own tasks, which the store enforces by filtering on `owner_id`.
/// Handlers call these after the token gate has produced an [`AuthContext`].
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::authorization::{require_admin, require_role};
/// use tasklist_shared::auth::middleware::AuthContext;
/// use tasklist_shared::models::user::Role;
///
/// let auth = AuthContext { user_id: 1, username: "johndoe".into(), role: Role::User };
///
/// assert!(require_role(&auth, Role::User).is_ok());
/// assert!(require_admin(&auth).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is below the required one
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: Role, actual: Role },
}

/// Requires the caller to hold `required`
///
/// `admin` satisfies any requirement.
pub fn require_role(auth: &AuthContext, required: Role) -> Result<(), AuthzError> {
    if auth.role == required || auth.role.is_admin() {
        return Ok(());
    }

    Err(AuthzError::InsufficientRole {
        required,
        actual: auth.role,
    })
}

pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    require_role(auth, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: i64, role: Role) -> AuthContext {
        AuthContext {
            user_id,
            username: format!("user{}", user_id),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&ctx(1, Role::Admin)).is_ok());

        let err = require_admin(&ctx(2, Role::User)).unwrap_err();
        assert!(matches!(
            err,
            AuthzError::InsufficientRole {
                required: Role::Admin,
                actual: Role::User
            }
        ));
    }

    #[test]
    fn test_admin_satisfies_user_role() {
        assert!(require_role(&ctx(1, Role::Admin), Role::User).is_ok());
        assert!(require_role(&ctx(2, Role::User), Role::User).is_ok());
    }

    #[test]
    fn test_authz_error_display() {
        let err = require_admin(&ctx(2, Role::User)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient permissions: requires admin, has user"
        );

    }
}
