/// API route handlers
///
/// - `health`: Liveness and database status
/// - `auth`: Registration and password login
/// - `todos`: The caller's own tasks
/// - `admin`: Tasks of every user (admin role)
/// - `users`: The caller's account

pub mod admin;
pub mod auth;
pub mod health;
pub mod todos;
pub mod users;
