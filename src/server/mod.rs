//! Web server for submitting URLs and browsing their checks.
//!
//! Pages:
//! - `/` submission form
//! - `/urls` every known site with its latest check
//! - `/urls/:id` one site with its check history and a "Run check" button

mod assets;
mod error;
mod flash;
mod handlers;
mod routes;
mod template_structs;

pub use error::AppError;
pub use flash::{Flash, FlashKey, FlashKind, FLASH_COOKIE};
pub use handlers::{CHECK_DONE, CHECK_FAILED, URL_ADDED, URL_ADD_FAILED, URL_EXISTS};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analyzer::PageAnalyzer;
use crate::config::Settings;
use crate::repository::DbContext;
use crate::services::UrlService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: UrlService,
    pub flash_key: Arc<FlashKey>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let ctx = settings.create_db_context()?;
        let analyzer = settings.create_analyzer()?;
        Ok(Self::from_context(&ctx, analyzer, &settings.secret_key))
    }

    /// Build state over an existing database context.
    pub fn from_context(ctx: &DbContext, analyzer: PageAnalyzer, secret_key: &str) -> Self {
        Self::from_service(UrlService::from_context(ctx, analyzer), secret_key)
    }

    pub fn from_service(service: UrlService, secret_key: &str) -> Self {
        Self {
            service,
            flash_key: Arc::new(FlashKey::from_secret(secret_key)),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
