//! Check results.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stored fetch-and-extract result for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    pub id: i64,
    pub url_id: i64,
    pub status_code: Option<i32>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a single page fetch produced, before it is stored.
///
/// Missing elements are `None`; an empty `<title></title>` is treated the
/// same as no title at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub status_code: u16,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageSummary {
    /// A summary for a response that carried no parseable HTML.
    pub fn status_only(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }
}
