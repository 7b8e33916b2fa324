/// Authentication endpoints
///
/// - `POST /auth/register` - Create a `user`-role account
/// - `POST /auth/token` - Exchange username and password for an access token
///
/// Registration never grants `admin`; the first admin comes from the
/// bootstrap settings.

use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, State},
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::{authenticator, password},
    models::user::{CreateUser, PublicUser, Role},
};
use tracing::info;
use validator::Validate;

use crate::{app::AppState, error::ApiResult};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

/// Login form, sent as `application/x-www-form-urlencoded`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "johndoe",
///   "email": "john@example.com",
///   "first_name": "John",
///   "last_name": "Doe",
///   "password": "secret"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Username or email already exists
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let Json(req) = payload?;
    req.validate()?;

    let hashed_password = password::spawn_hash_password(&req.password).await?;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            hashed_password,
            role: Role::User,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with a username and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/token
/// Content-Type: application/x-www-form-urlencoded
///
/// username=johndoe&password=secret
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown user, wrong password, or inactive account
pub async fn login_for_access_token(
    State(state): State<AppState>,
    payload: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(form) = payload?;

    let issued = authenticator::authenticate(
        &*state.store,
        &form.username,
        &form.password,
        state.jwt_secret(),
        state.config.token_ttl(),
    )
    .await?;

    info!(username = %form.username, "Access token issued");

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: "bearer".to_string(),
    }))
}
