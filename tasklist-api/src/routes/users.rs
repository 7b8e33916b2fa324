/// Endpoints for the caller's own account
///
/// - `GET   /users/current-user`    - Account details, without the password hash
/// - `PATCH /users/change-password` - Set a new password (204)

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasklist_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{PublicUser, User},
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub new_password: String,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

async fn load_caller(state: &AppState, auth: &AuthContext) -> ApiResult<User> {
    state
        .store
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(user_not_found)
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<PublicUser>> {
    let user = load_caller(&state, &auth).await?;
    Ok(Json(user.into()))
}

/// Replace the caller's password
///
/// # Endpoint
///
/// ```text
/// PATCH /users/change-password
/// Content-Type: application/json
///
/// { "new_password": "new-secret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Shorter than 4 characters, or equal to the current password
/// - `404 Not Found`: The account no longer exists
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    req.validate()?;

    let user = load_caller(&state, &auth).await?;

    if password::spawn_verify_password(&req.new_password, &user.hashed_password).await? {
        return Err(ApiError::invalid_field(
            "new_password",
            "New password is the same as the current one",
        ));
    }

    let hashed_password = password::spawn_hash_password(&req.new_password).await?;

    if !state.store.update_password(user.id, &hashed_password).await? {
        return Err(user_not_found());
    }

    info!(user_id = user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
