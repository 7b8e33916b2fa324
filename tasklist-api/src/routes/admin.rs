/// Admin endpoints
///
/// - `GET    /admin/todo`     - List every task
/// - `DELETE /admin/todo/:id` - Delete any task (204)
///
/// Callers without the `admin` role get 403.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tasklist_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::task::Task,
};
use tracing::{info, warn};

use super::todos::{task_id, task_not_found};
use crate::{app::AppState, error::ApiResult};

fn ensure_admin(auth: &AuthContext) -> ApiResult<()> {
    require_admin(auth).map_err(|e| {
        warn!(user_id = auth.user_id, "Admin endpoint refused");
        e.into()
    })
}

pub async fn list_all_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    ensure_admin(&auth)?;

    Ok(Json(state.store.list_all_tasks().await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    ensure_admin(&auth)?;
    let id = task_id(path)?;

    if !state.store.delete_task(id).await? {
        return Err(task_not_found());
    }

    info!(task_id = id, admin_id = auth.user_id, "Task deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
