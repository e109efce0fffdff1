//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Rows hold display-ready strings so templates carry no formatting logic.

use askama::Template;
use chrono::{DateTime, Utc};

use super::flash::Flash;
use crate::models::{Url, UrlCheck, UrlListing};

/// Banner shown at the top of a page.
pub struct Notice {
    pub class: &'static str,
    pub message: String,
}

impl From<Flash> for Notice {
    fn from(flash: Flash) -> Self {
        Self {
            class: flash.kind.as_str(),
            message: flash.message,
        }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn or_blank(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Row in the URL listing.
pub struct UrlRow {
    pub id: i64,
    pub name: String,
    pub last_checked: String,
    pub status_code: String,
}

impl From<&UrlListing> for UrlRow {
    fn from(listing: &UrlListing) -> Self {
        let check = listing.latest_check.as_ref();
        Self {
            id: listing.url.id,
            name: listing.url.name.clone(),
            last_checked: check
                .map(|c| format_datetime(&c.created_at))
                .unwrap_or_default(),
            status_code: check
                .and_then(|c| c.status_code)
                .map(|code| code.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Row in a URL's check history.
pub struct CheckRow {
    pub id: i64,
    pub status_code: String,
    pub h1: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
}

impl From<&UrlCheck> for CheckRow {
    fn from(check: &UrlCheck) -> Self {
        Self {
            id: check.id,
            status_code: check
                .status_code
                .map(|code| code.to_string())
                .unwrap_or_default(),
            h1: or_blank(&check.h1),
            title: or_blank(&check.title),
            description: or_blank(&check.description),
            created_at: format_datetime(&check.created_at),
        }
    }
}

/// Landing page with the submission form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub notice: Option<Notice>,
    pub url_value: String,
}

/// All submitted URLs.
#[derive(Template)]
#[template(path = "urls.html")]
pub struct UrlsTemplate {
    pub notice: Option<Notice>,
    pub rows: Vec<UrlRow>,
}

/// One URL and its check history.
#[derive(Template)]
#[template(path = "url_show.html")]
pub struct UrlShowTemplate {
    pub notice: Option<Notice>,
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub checks: Vec<CheckRow>,
}

impl UrlShowTemplate {
    pub fn new(notice: Option<Notice>, url: &Url, checks: &[UrlCheck]) -> Self {
        Self {
            notice,
            id: url.id,
            name: url.name.clone(),
            created_at: format_datetime(&url.created_at),
            checks: checks.iter().map(CheckRow::from).collect(),
        }
    }
}

/// Not-found and internal error pages.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub notice: Option<Notice>,
    pub status: u16,
    pub heading: &'static str,
    pub message: String,
}
