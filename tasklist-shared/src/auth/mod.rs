/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, time-limited access tokens
/// - [`authenticator`]: Username/password check and token issuance
/// - [`middleware`]: Bearer token gate for Axum routes
/// - [`authorization`]: Role and ownership checks
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authenticator;
pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
