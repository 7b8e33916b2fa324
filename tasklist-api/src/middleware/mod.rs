/// Middleware for the API server
///
/// - `security`: Hardening headers on every response

pub mod security;
