//! Page Analyzer - check websites for SEO suitability.
//!
//! Users submit URLs, which are stored once per scheme and host. A check
//! fetches the page and records its status code, first `<h1>`, `<title>` and
//! meta description.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod http_client;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
pub mod url_utils;
