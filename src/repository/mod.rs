//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking.
//! Supports both SQLite and PostgreSQL backends.

pub mod check;
pub mod context;
pub mod models;
pub mod pool;
pub mod store;
pub mod url;
pub mod util;

pub use check::DieselCheckRepository;
pub use context::DbContext;
pub use pool::{DbError, DbPool};
pub use store::{CheckStore, UrlStore};
pub use url::DieselUrlRepository;
