//! HTTP response wrapper.

use std::collections::HashMap;

use reqwest::{Response, StatusCode};

/// HTTP response wrapper. Header names are lower-cased.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub(crate) response: Response,
}

impl HttpResponse {
    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(|s| s.as_str())
    }

    /// Whether the body is an HTML document worth parsing.
    pub fn is_html(&self) -> bool {
        self.content_type().is_some_and(is_html_content_type)
    }

    /// Get response body as text.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }
}

/// `text/html` or `application/xhtml+xml`, ignoring parameters and case.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    mime.eq_ignore_ascii_case("text/html") || mime.eq_ignore_ascii_case("application/xhtml+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("TEXT/HTML;charset=UTF-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
    }

    #[test]
    fn test_non_html_content_types() {
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("text/plain"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type(""));
    }
}
