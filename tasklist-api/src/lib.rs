//! # Tasklist API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: First admin account
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
