//! Submitted website records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UrlCheck;

/// A submitted website, identified by its normalized `scheme://host[:port]` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Url {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A URL together with its most recent check, as shown on the listing page.
#[derive(Debug, Clone, Serialize)]
pub struct UrlListing {
    pub url: Url,
    pub latest_check: Option<UrlCheck>,
}
