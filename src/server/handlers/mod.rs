//! HTTP request handlers for the web server.

mod checks;
mod helpers;
mod pages;
mod static_files;
mod urls;

// Re-export handlers for use by the router
pub use checks::{create_check, CHECK_DONE, CHECK_FAILED};
pub use pages::index;
pub use static_files::serve_css;
pub use urls::{create_url, list_urls, show_url, URL_ADDED, URL_ADD_FAILED, URL_EXISTS};
