//! Store interfaces consumed by the service layer and the web server.

use async_trait::async_trait;

use super::pool::DbError;
use crate::models::{PageSummary, Url, UrlCheck, UrlListing};

/// Persistence for submitted URLs.
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Exact match on the normalized name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Url>, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, DbError>;

    /// Get-or-create: returns the id of the row named `name` and whether this
    /// call inserted it.
    async fn insert(&self, name: &str) -> Result<(i64, bool), DbError>;

    /// All URLs, newest first, each with its most recent check.
    async fn list_with_latest_check(&self) -> Result<Vec<UrlListing>, DbError>;
}

/// Persistence for check results.
#[async_trait]
pub trait CheckStore: Send + Sync {
    /// Store a check for `url_id`. Returns `None` when no such URL exists.
    async fn insert(&self, url_id: i64, summary: &PageSummary) -> Result<Option<i64>, DbError>;

    /// Checks for a URL, newest first.
    async fn list_by_url(&self, url_id: i64) -> Result<Vec<UrlCheck>, DbError>;

    async fn latest_by_url(&self, url_id: i64) -> Result<Option<UrlCheck>, DbError>;
}
