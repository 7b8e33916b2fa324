/// Storage seam between handlers and persistence
///
/// Handlers depend on the [`Store`] trait object rather than on a pool, so
/// the same access-control code runs against PostgreSQL in production and
/// against [`MemoryStore`] in tests and local demos.
///
/// # Implementations
///
/// - [`PgStore`]: Delegates to the model functions over a `PgPool`
/// - [`MemoryStore`]: Maps behind a `tokio::sync::RwLock`, IDs from 1
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasklist_shared::store::{MemoryStore, Store};
///
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// ```

use async_trait::async_trait;

use crate::models::{
    task::{Task, TaskInput},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field is already taken
    #[error("Conflict: {0} already exists")]
    Conflict(String),

    /// A referenced row does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new active user
    ///
    /// Fails with [`StoreError::Conflict`] when the username or email is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Replaces the password hash; false if the user does not exist
    async fn update_password(&self, id: i64, hashed_password: &str) -> StoreResult<bool>;

    /// Activates or deactivates a user; false if the user does not exist
    async fn set_user_active(&self, id: i64, is_active: bool) -> StoreResult<bool>;
}

/// Persisted tasks
///
/// Methods suffixed `_for_owner` match on both task ID and owner ID, so a
/// task owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task
    ///
    /// Fails with [`StoreError::InvalidReference`] when the owner does not exist.
    async fn create_task(&self, owner_id: i64, data: TaskInput) -> StoreResult<Task>;

    /// Tasks owned by `owner_id`, ordered by ID
    async fn list_tasks_for_owner(&self, owner_id: i64) -> StoreResult<Vec<Task>>;

    /// Every task, ordered by ID
    async fn list_all_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn find_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>>;

    /// Replaces all mutable fields of an owned task
    async fn update_task_for_owner(
        &self,
        id: i64,
        owner_id: i64,
        data: TaskInput,
    ) -> StoreResult<Option<Task>>;

    async fn delete_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<bool>;

    /// Deletes a task regardless of owner
    async fn delete_task(&self, id: i64) -> StoreResult<bool>;
}

/// Everything the API needs from persistence
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// Checks that the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;
}
