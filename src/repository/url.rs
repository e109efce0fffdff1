//! Diesel-based URL repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::models::{NewUrl, UrlCheckRecord, UrlRecord};
use super::pool::{DbError, DbPool};
use super::store::UrlStore;
use super::util::format_timestamp;
use crate::models::{Url, UrlCheck, UrlListing};
use crate::schema::urls;
use crate::with_conn;

/// Latest check per URL. Checks sharing a timestamp are ordered by id, so the
/// most recently inserted one wins.
const LATEST_CHECKS_SQL: &str = r#"
    SELECT c.id, c.url_id, c.status_code, c.h1, c.title, c.description, c.created_at
    FROM url_checks c
    WHERE c.id = (
        SELECT c2.id
        FROM url_checks c2
        WHERE c2.url_id = c.url_id
        ORDER BY c2.created_at DESC, c2.id DESC
        LIMIT 1
    )
"#;

/// URL repository backed by SQLite or PostgreSQL.
#[derive(Clone)]
pub struct DieselUrlRepository {
    pool: DbPool,
}

impl DieselUrlRepository {
    /// Create a new URL repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStore for DieselUrlRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Url>, DbError> {
        with_conn!(self.pool, conn => {
            urls::table
                .filter(urls::name.eq(name))
                .select(UrlRecord::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Url::from))
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, DbError> {
        with_conn!(self.pool, conn => {
            urls::table
                .find(id)
                .select(UrlRecord::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Url::from))
        })
    }

    async fn insert(&self, name: &str) -> Result<(i64, bool), DbError> {
        let created_at = format_timestamp(Utc::now());
        let new_url = NewUrl {
            name,
            created_at: &created_at,
        };

        with_conn!(self.pool, conn => {
            conn.transaction::<_, DbError, _>(|conn| {
                async move {
                    // The unique constraint on name decides races; the loser
                    // inserts nothing and reads the winner's id.
                    let inserted = diesel::insert_into(urls::table)
                        .values(&new_url)
                        .on_conflict(urls::name)
                        .do_nothing()
                        .returning(urls::id)
                        .get_result::<i64>(conn)
                        .await
                        .optional()?;

                    match inserted {
                        Some(id) => Ok((id, true)),
                        None => urls::table
                            .filter(urls::name.eq(name))
                            .select(urls::id)
                            .first::<i64>(conn)
                            .await
                            .map(|id| (id, false)),
                    }
                }
                .scope_boxed()
            })
            .await
        })
    }

    async fn list_with_latest_check(&self) -> Result<Vec<UrlListing>, DbError> {
        with_conn!(self.pool, conn => {
            let records: Vec<UrlRecord> = urls::table
                .select(UrlRecord::as_select())
                .order((urls::created_at.desc(), urls::id.desc()))
                .load(&mut conn)
                .await?;

            let latest: Vec<UrlCheckRecord> = diesel::sql_query(LATEST_CHECKS_SQL)
                .load(&mut conn)
                .await?;

            let mut latest_by_url: HashMap<i64, UrlCheck> = latest
                .into_iter()
                .map(|record| (record.url_id, UrlCheck::from(record)))
                .collect();

            Ok(records
                .into_iter()
                .map(|record| {
                    let latest_check = latest_by_url.remove(&record.id);
                    UrlListing {
                        url: Url::from(record),
                        latest_check,
                    }
                })
                .collect())
        })
    }
}
