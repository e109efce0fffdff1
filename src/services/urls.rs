//! URL submission and page checks.
//!
//! Shared by the web handlers and the CLI; neither touches the stores
//! directly for these flows.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analyzer::{FetchError, PageAnalyzer};
use crate::models::{PageSummary, Url, UrlCheck, UrlListing};
use crate::repository::{CheckStore, DbContext, DbError, UrlStore};
use crate::url_utils::{normalize, validate, ValidationError};

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new row was stored.
    Created(i64),
    /// The normalized name was already known.
    Existing(i64),
}

impl SubmitOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created(id) | Self::Existing(id) => *id,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to store URL: {0}")]
    Store(#[from] DbError),
}

#[derive(Debug, Error)]
pub enum RunCheckError {
    #[error("URL {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to store check: {0}")]
    Store(#[from] DbError),
}

/// A check that was fetched and stored.
#[derive(Debug, Clone)]
pub struct CompletedCheck {
    pub id: i64,
    pub summary: PageSummary,
}

/// A URL with its full check history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct UrlDetail {
    pub url: Url,
    pub checks: Vec<UrlCheck>,
}

/// Orchestrates the stores and the page analyzer.
#[derive(Clone)]
pub struct UrlService {
    urls: Arc<dyn UrlStore>,
    checks: Arc<dyn CheckStore>,
    analyzer: PageAnalyzer,
}

impl UrlService {
    pub fn new(
        urls: Arc<dyn UrlStore>,
        checks: Arc<dyn CheckStore>,
        analyzer: PageAnalyzer,
    ) -> Self {
        Self {
            urls,
            checks,
            analyzer,
        }
    }

    /// Build a service over the Diesel stores of `ctx`.
    pub fn from_context(ctx: &DbContext, analyzer: PageAnalyzer) -> Self {
        Self::new(Arc::new(ctx.urls()), Arc::new(ctx.checks()), analyzer)
    }

    /// Validate, normalize and store a submitted URL.
    pub async fn submit_url(&self, raw: Option<&str>) -> Result<SubmitOutcome, SubmitError> {
        let raw = validate(raw).inspect_err(|e| {
            info!(error = %e, "rejected URL submission");
        })?;
        let name = normalize(raw);

        if let Some(existing) = self.urls.find_by_name(&name).await? {
            info!(id = existing.id, name = %name, "URL already exists");
            return Ok(SubmitOutcome::Existing(existing.id));
        }

        let (id, created) = self.urls.insert(&name).await.inspect_err(|e| {
            warn!(name = %name, error = %e, "failed to insert URL");
        })?;
        if !created {
            // Lost a race with a concurrent submission of the same site.
            info!(id, name = %name, "URL already exists");
            return Ok(SubmitOutcome::Existing(id));
        }
        info!(id, name = %name, "URL added");
        Ok(SubmitOutcome::Created(id))
    }

    /// Fetch the page for `url_id` and store the result as a new check.
    pub async fn run_check(&self, url_id: i64) -> Result<CompletedCheck, RunCheckError> {
        let url = self
            .urls
            .find_by_id(url_id)
            .await?
            .ok_or(RunCheckError::NotFound(url_id))?;

        let summary = self.analyzer.check(&url.name).await?;

        let id = self
            .checks
            .insert(url.id, &summary)
            .await?
            .ok_or(RunCheckError::NotFound(url_id))?;

        info!(
            url_id,
            check_id = id,
            status_code = summary.status_code,
            "check stored"
        );
        Ok(CompletedCheck { id, summary })
    }

    /// All URLs with their latest check, newest first.
    pub async fn list(&self) -> Result<Vec<UrlListing>, DbError> {
        self.urls.list_with_latest_check().await
    }

    /// One URL and its history, or `None` if the id is unknown.
    pub async fn detail(&self, url_id: i64) -> Result<Option<UrlDetail>, DbError> {
        let Some(url) = self.urls.find_by_id(url_id).await? else {
            return Ok(None);
        };
        let checks = self.checks.list_by_url(url.id).await?;
        Ok(Some(UrlDetail { url, checks }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::tempdir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (UrlService, DbContext, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        let analyzer = PageAnalyzer::new(Duration::from_secs(5), None).unwrap();
        (UrlService::from_context(&ctx, analyzer), ctx, dir)
    }

    #[tokio::test]
    async fn test_submit_creates_then_finds_existing() {
        let (service, _ctx, _dir) = setup().await;

        let first = service
            .submit_url(Some("http://example.com/"))
            .await
            .unwrap();
        assert!(matches!(first, SubmitOutcome::Created(_)));

        let second = service
            .submit_url(Some("http://example.com/page?x=1"))
            .await
            .unwrap();
        assert_eq!(second, SubmitOutcome::Existing(first.id()));

        let listing = service.list().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].url.name, "http://example.com");
    }

    #[tokio::test]
    async fn test_submit_invalid_stores_nothing() {
        let (service, _ctx, _dir) = setup().await;

        let err = service.submit_url(Some("not a url")).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Invalid(ValidationError::Malformed)
        ));

        let err = service.submit_url(None).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ValidationError::Missing)));

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_check_stores_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<title>T</title><meta name=\"description\" content=\"D\"><h1>Hello</h1>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let (service, ctx, _dir) = setup().await;
        let (url_id, _) = ctx.urls().insert(&server.uri()).await.unwrap();

        let done = service.run_check(url_id).await.unwrap();
        assert_eq!(done.summary.status_code, 200);

        let detail = service.detail(url_id).await.unwrap().unwrap();
        assert_eq!(detail.checks.len(), 1);
        let check = &detail.checks[0];
        assert_eq!(check.id, done.id);
        assert_eq!(check.status_code, Some(200));
        assert_eq!(check.h1.as_deref(), Some("Hello"));
        assert_eq!(check.title.as_deref(), Some("T"));
        assert_eq!(check.description.as_deref(), Some("D"));
    }

    #[tokio::test]
    async fn test_run_check_unknown_url() {
        let (service, _ctx, _dir) = setup().await;
        let err = service.run_check(999).await.unwrap_err();
        assert!(matches!(err, RunCheckError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_run_check_fetch_failure_records_nothing() {
        let (service, ctx, _dir) = setup().await;
        let (url_id, _) = ctx.urls().insert("http://127.0.0.1:1").await.unwrap();

        let err = service.run_check(url_id).await.unwrap_err();
        assert!(matches!(err, RunCheckError::Fetch(_)));

        let detail = service.detail(url_id).await.unwrap().unwrap();
        assert!(detail.checks.is_empty());
    }

    #[tokio::test]
    async fn test_detail_unknown_is_none() {
        let (service, _ctx, _dir) = setup().await;
        assert!(service.detail(12345).await.unwrap().is_none());
    }

    /// Reports every id as a URL pointing at `0`. Inserts always find a row
    /// that another caller created first.
    struct FixedUrl(String);

    #[async_trait]
    impl UrlStore for FixedUrl {
        async fn find_by_name(&self, _name: &str) -> Result<Option<Url>, DbError> {
            Ok(None)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Url>, DbError> {
            Ok(Some(Url {
                id,
                name: self.0.clone(),
                created_at: Utc::now(),
            }))
        }

        async fn insert(&self, _name: &str) -> Result<(i64, bool), DbError> {
            Ok((1, false))
        }

        async fn list_with_latest_check(&self) -> Result<Vec<UrlListing>, DbError> {
            Ok(Vec::new())
        }
    }

    /// Behaves as if the URL was deleted before the check was stored.
    struct VanishedChecks;

    #[async_trait]
    impl CheckStore for VanishedChecks {
        async fn insert(
            &self,
            _url_id: i64,
            _summary: &PageSummary,
        ) -> Result<Option<i64>, DbError> {
            Ok(None)
        }

        async fn list_by_url(&self, _url_id: i64) -> Result<Vec<UrlCheck>, DbError> {
            Ok(Vec::new())
        }

        async fn latest_by_url(&self, _url_id: i64) -> Result<Option<UrlCheck>, DbError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_url_deleted_during_check_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>x</h1>", "text/html"))
            .mount(&server)
            .await;

        let service = UrlService::new(
            Arc::new(FixedUrl(server.uri())),
            Arc::new(VanishedChecks),
            PageAnalyzer::new(Duration::from_secs(5), None).unwrap(),
        );

        let err = service.run_check(7).await.unwrap_err();
        assert!(matches!(err, RunCheckError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_submit_losing_insert_race_is_existing() {
        let service = UrlService::new(
            Arc::new(FixedUrl("http://example.com".to_string())),
            Arc::new(VanishedChecks),
            PageAnalyzer::new(Duration::from_secs(5), None).unwrap(),
        );

        let outcome = service.submit_url(Some("http://example.com")).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Existing(1));
    }

    #[tokio::test]
    async fn test_submit_same_host_with_out_of_range_port_is_rejected() {
        let (service, _ctx, _dir) = setup().await;

        for raw in ["http://example.com:99999/a", "http://example.com:99999/b?x=1"] {
            let err = service.submit_url(Some(raw)).await.unwrap_err();
            assert!(matches!(err, SubmitError::Invalid(ValidationError::Malformed)));
        }
        assert!(service.list().await.unwrap().is_empty());
    }
}
