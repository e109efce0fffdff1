//! URL validation and normalization for submitted websites.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// Longest accepted submission, in characters.
pub const MAX_URL_LENGTH: usize = 255;

/// `http(s)://` followed by a domain, `localhost` or an IPv4 address, an
/// optional port and an optional path/query.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("URL pattern is valid")
});

/// Why a submitted URL was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL is required")]
    Missing,

    #[error("URL exceeds 255 characters")]
    TooLong,

    #[error("Invalid URL")]
    Malformed,
}

impl ValidationError {
    /// Message shown to the user next to the submission form.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Validate a raw submission before normalization.
///
/// Returns the accepted input on success.
pub fn validate(raw: Option<&str>) -> Result<&str, ValidationError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::Missing),
    };

    if raw.chars().count() > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong);
    }

    // The pattern admits ports past 65535 and octets past 255, which the
    // parser rejects; both must agree or normalize would keep the path.
    if !URL_PATTERN.is_match(raw) || !has_host(raw) {
        return Err(ValidationError::Malformed);
    }

    Ok(raw)
}

fn has_host(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|parsed| parsed.host_str().is_some())
}

/// Reduce a URL to its `scheme://host[:port]` identity.
///
/// Path, query, fragment and credentials are dropped; scheme and host come
/// back lower-cased and a default port is omitted. Input that cannot be
/// parsed as an absolute URL with a host is returned unchanged.
pub fn normalize(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };

    match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    }
}
