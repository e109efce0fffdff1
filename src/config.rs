//! Configuration for the page analyzer.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::{FetchError, PageAnalyzer};
use crate::repository::util::{is_postgres_url, redact_url_password};
use crate::repository::{DbContext, DbError};

/// Database used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:page_analyzer.db";

/// Address the server listens on by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Development-only signing secret for flash cookies.
pub const DEFAULT_SECRET_KEY: &str = "dev";

/// Default page fetch timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILENAME: &str = "page-analyzer.toml";

/// Errors raised while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("PostgreSQL database URL {0} requires a build with the 'postgres' feature")]
    PostgresUnavailable(String),
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `sqlite:<path>`, a bare path, or a `postgres://` URL.
    pub database_url: String,
    /// Key material for signing flash cookies.
    pub secret_key: String,
    /// Server bind address (`PORT`, `HOST` or `HOST:PORT`).
    pub bind: String,
    /// Page fetch timeout in seconds.
    pub request_timeout: u64,
    /// User agent for page fetches. `None` uses the built-in one.
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            bind: DEFAULT_BIND.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Check if using PostgreSQL (vs SQLite).
    pub fn is_postgres(&self) -> bool {
        is_postgres_url(&self.database_url)
    }

    /// Whether flash cookies are signed with the development secret.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Database URL safe to print or log.
    pub fn display_database_url(&self) -> String {
        redact_url_password(&self.database_url)
    }

    /// Create a database context using the configured database URL.
    pub fn create_db_context(&self) -> Result<DbContext, DbError> {
        DbContext::from_url(&self.database_url)
    }

    /// Create the page analyzer with the configured timeout and user agent.
    pub fn create_analyzer(&self) -> Result<PageAnalyzer, FetchError> {
        PageAnalyzer::new(self.request_timeout(), self.user_agent.as_deref())
    }
}

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub secret_key: Option<String>,
    pub bind: Option<String>,
    pub request_timeout: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Load a config file from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay the values present in this file onto `settings`.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.database_url {
            settings.database_url = url.clone();
        }
        if let Some(ref secret) = self.secret_key {
            settings.secret_key = secret.clone();
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref ua) = self.user_agent {
            settings.user_agent = Some(ua.clone());
        }
    }
}

/// Options for loading settings, usually taken from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Directory searched for [`DEFAULT_CONFIG_FILENAME`]. Defaults to the CWD.
    pub search_dir: Option<PathBuf>,
    /// `--database-url` flag; beats every other source.
    pub database_url: Option<String>,
}

/// Load settings from defaults, config file and the process environment.
pub fn load_settings_with_options(options: LoadOptions) -> Result<Settings, ConfigError> {
    load_settings(options, |key| std::env::var(key).ok())
}

/// Load settings using `env` to look up environment variables.
pub fn load_settings(
    options: LoadOptions,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(path) = config_file_path(&options) {
        tracing::debug!("Loading config from {}", path.display());
        FileConfig::load_from_path(&path)?.apply_to_settings(&mut settings);
    }

    let env = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(url) = env("DATABASE_URL") {
        settings.database_url = url;
    }
    if let Some(secret) = env("SECRET_KEY") {
        settings.secret_key = secret;
    }
    if let Some(bind) = env("PAGE_ANALYZER_BIND") {
        settings.bind = bind;
    }
    if let Some(timeout) = env("PAGE_ANALYZER_REQUEST_TIMEOUT") {
        settings.request_timeout = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "PAGE_ANALYZER_REQUEST_TIMEOUT",
            value: timeout.clone(),
        })?;
    }
    if let Some(ua) = env("PAGE_ANALYZER_USER_AGENT") {
        settings.user_agent = Some(ua);
    }

    if let Some(url) = options.database_url.filter(|s| !s.is_empty()) {
        settings.database_url = url;
    }

    validate_settings(&settings)?;

    tracing::debug!(
        "Using database {}",
        redact_url_password(&settings.database_url)
    );
    if settings.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; flash cookies are signed with the development key");
    }

    Ok(settings)
}

fn config_file_path(options: &LoadOptions) -> Option<PathBuf> {
    // Priority 1: Explicit --config flag
    if let Some(ref path) = options.config_path {
        return Some(path.clone());
    }

    // Priority 2: page-analyzer.toml in the search dir
    let dir = options
        .search_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())?;
    let candidate = dir.join(DEFAULT_CONFIG_FILENAME);
    candidate.is_file().then_some(candidate)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.request_timeout == 0 {
        return Err(ConfigError::InvalidValue {
            key: "request_timeout",
            value: "0".to_string(),
        });
    }
    if settings.is_postgres() && !cfg!(feature = "postgres") {
        return Err(ConfigError::PostgresUnavailable(
            settings.display_database_url(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn isolated_options(dir: &Path) -> LoadOptions {
        LoadOptions {
            search_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(isolated_options(dir.path()), env_from(&[])).unwrap();

        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.bind, DEFAULT_BIND);
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert!(settings.uses_default_secret());
        assert!(settings.user_agent.is_none());
        assert!(!settings.is_postgres());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let dir = tempdir().unwrap();
        let env = env_from(&[
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("SECRET_KEY", "s3cret"),
            ("PAGE_ANALYZER_BIND", "0.0.0.0:9000"),
            ("PAGE_ANALYZER_REQUEST_TIMEOUT", "3"),
            ("PAGE_ANALYZER_USER_AGENT", "TestBot/1.0"),
        ]);
        let settings = load_settings(isolated_options(dir.path()), env).unwrap();

        assert_eq!(settings.database_url, "sqlite:/tmp/other.db");
        assert_eq!(settings.secret_key, "s3cret");
        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.request_timeout, 3);
        assert_eq!(settings.user_agent.as_deref(), Some("TestBot/1.0"));
        assert!(!settings.uses_default_secret());
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let dir = tempdir().unwrap();
        let env = env_from(&[("DATABASE_URL", ""), ("SECRET_KEY", "")]);
        let settings = load_settings(isolated_options(dir.path()), env).unwrap();

        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert!(settings.uses_default_secret());
    }

    #[test]
    fn test_file_then_env_then_flag() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILENAME),
            r#"
database_url = "sqlite:from-file.db"
bind = "8080"
request_timeout = 20
"#,
        )
        .unwrap();

        let settings = load_settings(isolated_options(dir.path()), env_from(&[])).unwrap();
        assert_eq!(settings.database_url, "sqlite:from-file.db");
        assert_eq!(settings.bind, "8080");
        assert_eq!(settings.request_timeout, 20);

        let env = env_from(&[("DATABASE_URL", "sqlite:from-env.db")]);
        let settings = load_settings(isolated_options(dir.path()), env).unwrap();
        assert_eq!(settings.database_url, "sqlite:from-env.db");
        assert_eq!(settings.bind, "8080");

        let options = LoadOptions {
            database_url: Some("sqlite:from-flag.db".to_string()),
            ..isolated_options(dir.path())
        };
        let env = env_from(&[("DATABASE_URL", "sqlite:from-env.db")]);
        let settings = load_settings(options, env).unwrap();
        assert_eq!(settings.database_url, "sqlite:from-flag.db");
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "secret_key = \"from-file\"\n").unwrap();

        let options = LoadOptions {
            config_path: Some(path),
            ..Default::default()
        };
        let settings = load_settings(options, env_from(&[])).unwrap();
        assert_eq!(settings.secret_key, "from-file");
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempdir().unwrap();
        let options = LoadOptions {
            config_path: Some(dir.path().join("missing.toml")),
            ..Default::default()
        };
        let err = load_settings(options, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILENAME), "colour = \"red\"\n").unwrap();

        let err = load_settings(isolated_options(dir.path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bad_timeout() {
        let dir = tempdir().unwrap();
        let env = env_from(&[("PAGE_ANALYZER_REQUEST_TIMEOUT", "soon")]);
        let err = load_settings(isolated_options(dir.path()), env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "PAGE_ANALYZER_REQUEST_TIMEOUT",
                ..
            }
        ));

        let env = env_from(&[("PAGE_ANALYZER_REQUEST_TIMEOUT", "0")]);
        assert!(load_settings(isolated_options(dir.path()), env).is_err());
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn test_postgres_requires_feature() {
        let dir = tempdir().unwrap();
        let env = env_from(&[("DATABASE_URL", "postgres://user:pw@localhost/db")]);
        let err = load_settings(isolated_options(dir.path()), env).unwrap_err();

        assert!(matches!(err, ConfigError::PostgresUnavailable(_)));
        assert!(!err.to_string().contains("pw"));
    }
}
