//! Outbound HTTP client used to fetch pages for checks.

mod response;

pub use response::HttpResponse;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::debug;

/// User agent sent when none is configured.
pub const USER_AGENT: &str = concat!("page-analyzer/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a reqwest client with a fixed timeout and user agent.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the default user agent.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(timeout, None)
    }

    /// Create a new HTTP client with a custom user agent.
    /// - None: use [`USER_AGENT`]
    /// - Some(custom): use the custom string
    pub fn with_user_agent(
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request. Any HTTP status counts as a response; only
    /// transport failures are errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        debug!(
            url,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched page"
        );

        Ok(HttpResponse {
            status: response.status(),
            headers,
            response,
        })
    }
}
