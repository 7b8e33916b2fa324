//! # Tasklist Shared Library
//!
//! This crate contains the types, storage and access-control logic used by
//! the Tasklist API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, token issuance/verification, authorization
//! - `db`: PostgreSQL pool and migrations
//! - `models`: Users and tasks, with their SQL operations
//! - `store`: Storage seam used by the handlers (Postgres and in-memory)

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
