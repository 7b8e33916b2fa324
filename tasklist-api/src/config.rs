/// Configuration management for the API server
///
/// Sources, lowest to highest precedence:
///
/// 1. Built-in defaults
/// 2. Optional `tasklist.toml` (or `.yaml`/`.json`) in the working directory
/// 3. `TASKLIST__SECTION__KEY` environment variables (e.g. `TASKLIST__API__PORT=9000`)
/// 4. `DATABASE_URL`, `JWT_SECRET`, `API_HOST` and `API_PORT`
///
/// A `.env` file is loaded into the process environment first.
///
/// # Example
///
/// ```no_run
/// use tasklist_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tasklist_shared::db::pool::DatabaseConfig as PoolConfig;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    pub logging: LoggingConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Enables HSTS
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    pub connect_timeout_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Lifetime of issued access tokens
    pub access_token_ttl_minutes: i64,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,

    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
}

/// Admin account seeded at startup
///
/// Seeding happens only when both username and password are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admin_username: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default)]
    pub admin_email: Option<String>,
}

/// Maps conventional variable names onto config keys
const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET", "jwt.secret"),
    ("API_HOST", "api.host"),
    ("API_PORT", "api.port"),
];

const MIN_SECRET_LEN: usize = 32;

impl Config {
    /// Loads and validates configuration from files and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse, a value has the wrong
    /// type, or [`Config::validate`] rejects the result.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(Some("tasklist"), &vars)
    }

    /// Builds configuration from an optional config file and a variable map
    pub fn from_sources(file: Option<&str>, vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8000)?
            .set_default("api.cors_origins", vec!["*"])?
            .set_default("api.production", false)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout_seconds", 30)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.access_token_ttl_minutes", 20)?
            .set_default("logging.format", "pretty")?
            .set_default(
                "logging.filter",
                "tasklist_api=debug,tasklist_shared=info,tower_http=debug",
            )?;

        if let Some(name) = file {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TASKLIST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.cors_origins")
                .source(Some(vars.clone())),
        );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, vars.get(var).cloned())?;
        }

        let config: Self = builder
            .build()?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("DATABASE_URL (or database.url) is required");
        }

        if self.jwt.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} bytes long", MIN_SECRET_LEN);
        }

        if self.jwt.access_token_ttl_minutes <= 0 {
            anyhow::bail!("jwt.access_token_ttl_minutes must be positive");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!("database.min_connections exceeds database.max_connections");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.jwt.access_token_ttl_minutes)
    }

    /// Pool settings for [`tasklist_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_seconds: self.database.connect_timeout_seconds,
            ..Default::default()
        }
    }
}
