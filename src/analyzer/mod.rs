//! Page checks: fetch a URL and summarize what it serves.

pub mod extract;

pub use extract::{extract, SeoTags};

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::http_client::HttpClient;
use crate::models::PageSummary;

/// The page could not be fetched. No check is recorded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Fetches pages and extracts their SEO fields.
#[derive(Clone)]
pub struct PageAnalyzer {
    client: HttpClient,
}

impl PageAnalyzer {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, FetchError> {
        let client = HttpClient::with_user_agent(timeout, user_agent).map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetch `url` once and summarize the response.
    ///
    /// Any HTTP status is a result, including 4xx and 5xx. Only transport
    /// failures and unreadable bodies are errors.
    pub async fn check(&self, url: &str) -> Result<PageSummary, FetchError> {
        let response = self.client.get(url).await.inspect_err(|e| {
            warn!(url, error = %e, "page fetch failed");
        })?;

        let status_code = response.status.as_u16();
        if !response.is_html() {
            debug!(url, status_code, content_type = ?response.content_type(), "skipping extraction");
            return Ok(PageSummary::status_only(status_code));
        }

        let body = response.text().await?;
        let tags = extract(&body);

        Ok(PageSummary {
            status_code,
            h1: tags.h1,
            title: tags.title,
            description: tags.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><head><title>T</title>
        <meta name="description" content="D"></head>
        <body><h1>Hello</h1></body></html>"#;

    fn analyzer(timeout: Duration) -> PageAnalyzer {
        PageAnalyzer::new(timeout, None).unwrap()
    }

    #[tokio::test]
    async fn test_check_extracts_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
            .mount(&server)
            .await;

        let summary = analyzer(Duration::from_secs(5))
            .check(&server.uri())
            .await
            .unwrap();

        assert_eq!(summary.status_code, 200);
        assert_eq!(summary.h1.as_deref(), Some("Hello"));
        assert_eq!(summary.title.as_deref(), Some("T"));
        assert_eq!(summary.description.as_deref(), Some("D"));
    }

    #[tokio::test]
    async fn test_error_status_is_still_a_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw("<h1>Not here</h1>", "text/html"),
            )
            .mount(&server)
            .await;

        let summary = analyzer(Duration::from_secs(5))
            .check(&server.uri())
            .await
            .unwrap();

        assert_eq!(summary.status_code, 404);
        assert_eq!(summary.h1.as_deref(), Some("Not here"));
    }

    #[tokio::test]
    async fn test_non_html_is_not_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{\"title\": \"x\"}", "application/json"),
            )
            .mount(&server)
            .await;

        let summary = analyzer(Duration::from_secs(5))
            .check(&server.uri())
            .await
            .unwrap();

        assert_eq!(summary, PageSummary::status_only(200));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let result = analyzer(Duration::from_secs(5))
            .check("http://127.0.0.1:1/")
            .await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(PAGE, "text/html")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let result = analyzer(Duration::from_millis(200))
            .check(&server.uri())
            .await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
