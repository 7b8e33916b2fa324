/// Database models for Tasklist
///
/// - `user`: Accounts, roles and credentials
/// - `task`: To-do items owned by a user
///
/// Each model exposes its SQL operations as associated functions taking a
/// `&PgPool`; handlers reach them through [`crate::store::PgStore`].

pub mod task;
pub mod user;
