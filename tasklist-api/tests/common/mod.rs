//! Shared setup for router-level integration tests
//!
//! Builds the real router over a [`MemoryStore`], seeds an admin and two
//! regular users, and mints tokens for them. No database or network is
//! needed.

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, sync::OnceLock};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tasklist_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasklist_shared::{
    auth::{
        authenticator::issue_token,
        jwt::{create_token, Claims},
        password::hash_password,
    },
    models::user::{CreateUser, Role, User},
    store::{MemoryStore, Store, UserStore},
};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "test1234!";

/// Argon2 is slow on purpose; hash the shared password once per test binary
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hash test password"))
        .clone()
}

pub fn test_config() -> Config {
    let vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgresql://unused/tasklist_test"),
        ("JWT_SECRET", JWT_SECRET),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Config::from_sources(None, &vars).expect("test config")
}

/// Test context containing the router and seeded accounts
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
    pub admin: User,
    pub alice: User,
    pub bob: User,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());

        let admin = create_user(&store, "admin", Role::Admin).await?;
        let alice = create_user(&store, "alice", Role::User).await?;
        let bob = create_user(&store, "bob", Role::User).await?;

        let dyn_store: Arc<dyn Store> = store.clone();
        let app = build_router(AppState::new(dyn_store, config.clone()));

        Ok(Self {
            app,
            store,
            config,
            admin,
            alice,
            bob,
        })
    }

    /// Valid access token for `user`
    pub fn token(&self, user: &User) -> String {
        issue_token(user, JWT_SECRET, self.config.token_ttl())
            .expect("issue token")
            .access_token
    }

    /// Token for `user` that expired an hour ago
    pub fn expired_token(&self, user: &User) -> String {
        let claims = Claims::new(user.id, user.username.clone(), user.role, Duration::hours(-1));
        create_token(&claims, JWT_SECRET).expect("create token")
    }

    /// Sends a request, optionally authenticated and with a JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.app
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router is infallible")
    }

    /// Like [`TestContext::request`], returning status and parsed JSON body
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        read_json(self.request(method, uri, token, body).await).await
    }

    /// Posts the login form
    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let form = format!("username={}&password={}", username, password);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .expect("build request");

        read_json(self.app.clone().oneshot(request).await.expect("router is infallible")).await
    }
}

async fn create_user(store: &MemoryStore, username: &str, role: Role) -> anyhow::Result<User> {
    Ok(store
        .create_user(CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            hashed_password: password_hash(),
            role,
        })
        .await?)
}

/// Status plus JSON body; an empty body reads as `Value::Null`
pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
        })
    };

    (status, value)
}
