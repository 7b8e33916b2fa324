/// PostgreSQL-backed store
///
/// Each call borrows one pooled connection for a single statement; sqlx
/// returns it to the pool when the query future completes or is dropped.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::{
    db::pool,
    models::{
        task::{Task, TaskInput},
        user::{CreateUser, User},
    },
};

/// Store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations to store errors, leaving the rest as database errors
fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();

        if db_err.is_unique_violation() {
            let field = if constraint.contains("username") {
                "username".to_string()
            } else if constraint.contains("email") {
                "email".to_string()
            } else {
                constraint
            };
            return StoreError::Conflict(field);
        }

        if db_err.is_foreign_key_violation() {
            return StoreError::InvalidReference(constraint);
        }
    }

    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        User::create(&self.pool, data).await.map_err(map_db_error)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn update_password(&self, id: i64, hashed_password: &str) -> StoreResult<bool> {
        Ok(User::update_password(&self.pool, id, hashed_password).await?)
    }

    async fn set_user_active(&self, id: i64, is_active: bool) -> StoreResult<bool> {
        Ok(User::set_active(&self.pool, id, is_active).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, owner_id: i64, data: TaskInput) -> StoreResult<Task> {
        Task::create(&self.pool, owner_id, data)
            .await
            .map_err(map_db_error)
    }

    async fn list_tasks_for_owner(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn list_all_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(Task::list_all(&self.pool).await?)
    }

    async fn find_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_for_owner(&self.pool, id, owner_id).await?)
    }

    async fn update_task_for_owner(
        &self,
        id: i64,
        owner_id: i64,
        data: TaskInput,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::update_for_owner(&self.pool, id, owner_id, data).await?)
    }

    async fn delete_task_for_owner(&self, id: i64, owner_id: i64) -> StoreResult<bool> {
        Ok(Task::delete_for_owner(&self.pool, id, owner_id).await?)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
