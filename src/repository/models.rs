//! Diesel ORM models for database tables.
//!
//! Records mirror the rows as stored (timestamps as text); conversions into
//! the domain models in `crate::models` live here too.

use diesel::prelude::*;

use super::util::parse_timestamp;
use crate::models::{Url, UrlCheck};
use crate::schema;

/// URL record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::urls)]
pub struct UrlRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// New URL for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::urls)]
pub struct NewUrl<'a> {
    pub name: &'a str,
    pub created_at: &'a str,
}

/// URL check record from the database.
///
/// Also loadable from raw SQL, which the latest-check listing uses.
#[derive(Queryable, QueryableByName, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::url_checks)]
pub struct UrlCheckRecord {
    pub id: i64,
    pub url_id: i64,
    pub status_code: Option<i32>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

/// New URL check for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::url_checks)]
pub struct NewUrlCheck<'a> {
    pub url_id: i64,
    pub status_code: Option<i32>,
    pub h1: Option<&'a str>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub created_at: &'a str,
}

impl From<UrlRecord> for Url {
    fn from(record: UrlRecord) -> Self {
        Url {
            id: record.id,
            name: record.name,
            created_at: parse_timestamp(&record.created_at),
        }
    }
}

impl From<UrlCheckRecord> for UrlCheck {
    fn from(record: UrlCheckRecord) -> Self {
        UrlCheck {
            id: record.id,
            url_id: record.url_id,
            status_code: record.status_code,
            h1: record.h1,
            title: record.title,
            description: record.description,
            created_at: parse_timestamp(&record.created_at),
        }
    }
}
