/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use tasklist_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tasklist_shared::{auth::middleware::create_jwt_middleware, store::Store};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::{ApiConfig, Config},
    middleware::security::SecurityHeadersLayer,
    routes,
};

/// Shared application state
///
/// Cloned per request by the `State` extractor; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health                  public
/// ├── POST   /auth/register           public
/// ├── POST   /auth/token              public (form login)
/// ├── GET    /                        caller's tasks
/// ├── GET    /todo/:id
/// ├── POST   /todo
/// ├── PUT    /todo/:id
/// ├── DELETE /todo/:id
/// ├── GET    /admin/todo              admin only
/// ├── DELETE /admin/todo/:id          admin only
/// ├── GET    /users/current-user
/// └── PATCH  /users/change-password
/// ```
///
/// Everything but the public routes sits behind the bearer token middleware,
/// which answers 401 before any handler or store access.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/token", post(routes::auth::login_for_access_token));

    let protected_routes = Router::new()
        .route("/", get(routes::todos::list_tasks))
        .route("/todo", post(routes::todos::create_task))
        .route(
            "/todo/:id",
            get(routes::todos::get_task)
                .put(routes::todos::update_task)
                .delete(routes::todos::delete_task),
        )
        .route("/admin/todo", get(routes::admin::list_all_tasks))
        .route("/admin/todo/:id", delete(routes::admin::delete_task))
        .route("/users/current-user", get(routes::users::current_user))
        .route("/users/change-password", patch(routes::users::change_password))
        .layer(middleware::from_fn(create_jwt_middleware(state.jwt_secret().to_owned())));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Permissive when the origin list contains `*`
fn cors_layer(api: &ApiConfig) -> CorsLayer {
    if api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
