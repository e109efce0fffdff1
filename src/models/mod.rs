//! Domain models for Page Analyzer.

mod check;
mod url;

pub use check::{PageSummary, UrlCheck};
pub use url::{Url, UrlListing};
