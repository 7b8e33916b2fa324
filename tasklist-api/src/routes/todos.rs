/// Task endpoints for the authenticated caller
///
/// Every query is scoped to `owner_id = caller`. A task owned by someone
/// else answers exactly like a missing one (404), so IDs of other users'
/// tasks cannot be discovered.
///
/// - `GET    /`          - List own tasks, ordered by ID
/// - `GET    /todo/:id`  - Fetch one own task
/// - `POST   /todo`      - Create a task (201)
/// - `PUT    /todo/:id`  - Replace all fields of an own task (204)
/// - `DELETE /todo/:id`  - Delete an own task (204)

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tasklist_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskInput},
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Extracts a task ID, rejecting zero and negatives
pub(crate) fn task_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = path?;

    if id <= 0 {
        return Err(ApiError::invalid_field("id", "ID must be greater than 0"));
    }

    Ok(id)
}

pub(crate) fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

fn task_input(payload: Result<Json<TaskInput>, JsonRejection>) -> ApiResult<TaskInput> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(input)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks_for_owner(auth.user_id).await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(path)?;

    state
        .store
        .find_task_for_owner(id, auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(task_not_found)
}

/// Create a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /todo
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "description": "Two liters",
///   "priority": 3,
///   "complete": false
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Title not 3-30 chars, description over 100 chars,
///   or priority outside 1-5
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let input = task_input(payload)?;

    let task = state.store.create_task(auth.user_id, input).await?;

    info!(task_id = task.id, owner_id = task.owner_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Overwrite title, description, priority and complete
///
/// This is a full replacement; all four fields are required.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = task_id(path)?;
    let input = task_input(payload)?;

    state
        .store
        .update_task_for_owner(id, auth.user_id, input)
        .await?
        .ok_or_else(task_not_found)?;

    info!(task_id = id, owner_id = auth.user_id, "Task updated");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = task_id(path)?;

    if !state.store.delete_task_for_owner(id, auth.user_id).await? {
        return Err(task_not_found());
    }

    info!(task_id = id, owner_id = auth.user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
