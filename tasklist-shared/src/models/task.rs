/// Task model and database operations
///
/// Every task belongs to exactly one user. Owner-scoped queries take the
/// owner ID as part of the `WHERE` clause so a row owned by someone else is
/// indistinguishable from a missing row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(30) NOT NULL,
///     description VARCHAR(100) NOT NULL,
///     priority INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 5),
///     complete BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id BIGINT NOT NULL REFERENCES users(id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

/// To-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
    /// User who created the task
    pub owner_id: i64,
}

/// The four caller-controlled fields of a task
///
/// Used for both create and update. Updates replace all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 3, max = 30, message = "Title must be 3-30 characters"))]
    pub title: String,

    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: String,

    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: i32,

    pub complete: bool,
}

const TASK_COLUMNS: &str = "id, title, description, priority, complete, owner_id";

impl Task {
    /// Inserts a task for `owner_id`
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if the owner does not exist.
    pub async fn create(pool: &PgPool, owner_id: i64, data: TaskInput) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (title, description, priority, complete, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.complete)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1 ORDER BY id");

        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");

        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Finds a task by ID, only if `owner_id` owns it
    pub async fn find_for_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner_id = $2");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrites all mutable fields of an owned task in one statement
    ///
    /// Returns `None` when the task is missing or owned by another user.
    pub async fn update_for_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        data: TaskInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, priority = $5, complete = $6
            WHERE id = $1 AND owner_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.complete)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_for_owner(pool: &PgPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes any task by ID regardless of owner (admin path)
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
