//! Diesel-based check repository.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;

use super::models::{NewUrlCheck, UrlCheckRecord};
use super::pool::{DbError, DbPool};
use super::store::CheckStore;
use super::util::format_timestamp;
use crate::models::{PageSummary, UrlCheck};
use crate::schema::url_checks;
use crate::with_conn;

/// Check repository backed by SQLite or PostgreSQL.
#[derive(Clone)]
pub struct DieselCheckRepository {
    pool: DbPool,
}

impl DieselCheckRepository {
    /// Create a new check repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckStore for DieselCheckRepository {
    async fn insert(&self, url_id: i64, summary: &PageSummary) -> Result<Option<i64>, DbError> {
        let created_at = format_timestamp(Utc::now());
        let new_check = NewUrlCheck {
            url_id,
            status_code: Some(i32::from(summary.status_code)),
            h1: summary.h1.as_deref(),
            title: summary.title.as_deref(),
            description: summary.description.as_deref(),
            created_at: &created_at,
        };

        // A single INSERT takes the write lock up front, so SQLite's busy
        // timeout applies. An unknown url_id trips the foreign key.
        with_conn!(self.pool, conn => {
            match diesel::insert_into(url_checks::table)
                .values(&new_check)
                .returning(url_checks::id)
                .get_result::<i64>(&mut conn)
                .await
            {
                Ok(id) => Ok(Some(id)),
                Err(DbError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    async fn list_by_url(&self, url_id: i64) -> Result<Vec<UrlCheck>, DbError> {
        with_conn!(self.pool, conn => {
            url_checks::table
                .filter(url_checks::url_id.eq(url_id))
                .select(UrlCheckRecord::as_select())
                .order((url_checks::created_at.desc(), url_checks::id.desc()))
                .load(&mut conn)
                .await
                .map(|records| records.into_iter().map(UrlCheck::from).collect())
        })
    }

    async fn latest_by_url(&self, url_id: i64) -> Result<Option<UrlCheck>, DbError> {
        with_conn!(self.pool, conn => {
            url_checks::table
                .filter(url_checks::url_id.eq(url_id))
                .select(UrlCheckRecord::as_select())
                .order((url_checks::created_at.desc(), url_checks::id.desc()))
                .first(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(UrlCheck::from))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::pool::SqlitePool;
    use crate::repository::{DbContext, UrlStore};
    use crate::schema::urls;
    use tempfile::tempdir;

    async fn setup_test_db() -> (DbContext, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        (ctx, dir)
    }

    fn summary(status_code: u16, h1: &str) -> PageSummary {
        PageSummary {
            status_code,
            h1: Some(h1.to_string()),
            title: Some("Title".to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_insert_for_unknown_url_stores_nothing() {
        let (ctx, _dir) = setup_test_db().await;
        let checks = ctx.checks();

        let id = checks.insert(42, &summary(200, "Hello")).await.unwrap();
        assert!(id.is_none());
        assert!(checks.list_by_url(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let (ctx, _dir) = setup_test_db().await;
        let (url_id, _) = ctx.urls().insert("https://example.com").await.unwrap();
        let checks = ctx.checks();

        let first = checks.insert(url_id, &summary(200, "one")).await.unwrap().unwrap();
        let second = checks.insert(url_id, &summary(404, "two")).await.unwrap().unwrap();

        let history = checks.list_by_url(url_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[0].status_code, Some(404));
        assert_eq!(history[0].h1.as_deref(), Some("two"));
        assert_eq!(history[0].description, None);
        assert_eq!(history[1].id, first);

        let latest = checks.latest_by_url(url_id).await.unwrap().unwrap();
        assert_eq!(latest, history[0]);
    }

    #[tokio::test]
    async fn test_latest_for_url_without_checks() {
        let (ctx, _dir) = setup_test_db().await;
        let (url_id, _) = ctx.urls().insert("https://example.com").await.unwrap();

        assert!(ctx.checks().latest_by_url(url_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checks_cascade_with_url() {
        let (ctx, dir) = setup_test_db().await;
        let (url_id, _) = ctx.urls().insert("https://example.com").await.unwrap();
        let checks = ctx.checks();
        checks.insert(url_id, &summary(200, "x")).await.unwrap();

        let pool = SqlitePool::from_path(&dir.path().join("test.db"));
        let mut conn = pool.get().await.unwrap();
        diesel::delete(urls::table.find(url_id))
            .execute(&mut conn)
            .await
            .unwrap();

        assert!(checks.list_by_url(url_id).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_all_stored() {
        let (ctx, _dir) = setup_test_db().await;
        let (url_id, _) = ctx.urls().insert("https://example.com").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let checks = ctx.checks();
            handles.push(tokio::spawn(async move {
                checks.insert(url_id, &summary(200, &format!("h{i}"))).await
            }));
        }

        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            assert!(id.is_some());
        }

        assert_eq!(ctx.checks().list_by_url(url_id).await.unwrap().len(), 8);
    }
}
