//! Service layer for page analyzer business logic.
//!
//! Services are used by both the CLI and the web server.

pub mod urls;

pub use urls::{
    CompletedCheck, RunCheckError, SubmitError, SubmitOutcome, UrlDetail, UrlService,
};
