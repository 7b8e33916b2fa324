/// Startup seeding of the first admin account
///
/// Registration only ever creates `user` accounts, so an `admin` has to come
/// from configuration. Seeding is idempotent: an existing account with the
/// configured username is left untouched, whatever its role.

use tasklist_shared::{
    auth::password,
    models::user::{CreateUser, Role, User},
    store::Store,
};
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Creates the configured admin if it does not exist yet
///
/// Returns the new user, or `None` when nothing was created.
pub async fn seed_admin(store: &dyn Store, config: &BootstrapConfig) -> anyhow::Result<Option<User>> {
    let (Some(username), Some(plain_password)) = (&config.admin_username, &config.admin_password)
    else {
        return Ok(None);
    };

    if let Some(existing) = store.find_user_by_username(username).await? {
        if !existing.role.is_admin() {
            warn!(username = %username, "Bootstrap admin name is taken by a non-admin user");
        }
        return Ok(None);
    }

    let email = config
        .admin_email
        .clone()
        .unwrap_or_else(|| format!("{}@localhost", username));

    let user = store
        .create_user(CreateUser {
            username: username.clone(),
            email,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            hashed_password: password::spawn_hash_password(plain_password).await?,
            role: Role::Admin,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "Seeded admin account");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_shared::store::{MemoryStore, UserStore};

    fn admin_config() -> BootstrapConfig {
        BootstrapConfig {
            admin_username: Some("root".to_string()),
            admin_password: Some("root-pass".to_string()),
            admin_email: None,
        }
    }

    #[tokio::test]
    async fn test_seed_admin_once() {
        let store = MemoryStore::new();

        let seeded = seed_admin(&store, &admin_config()).await.unwrap().unwrap();
        assert_eq!(seeded.role, Role::Admin);
        assert_eq!(seeded.email, "root@localhost");
        assert!(password::verify_password("root-pass", &seeded.hashed_password).unwrap());

        assert!(seed_admin(&store, &admin_config()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_admin_skipped_without_credentials() {
        let store = MemoryStore::new();
        let config = BootstrapConfig {
            admin_password: None,
            ..admin_config()
        };

        assert!(seed_admin(&store, &config).await.unwrap().is_none());
        assert!(store.find_user_by_username("root").await.unwrap().is_none());
    }
}
