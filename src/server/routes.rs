//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/urls", get(handlers::list_urls).post(handlers::create_url))
        .route("/urls/:id", get(handlers::show_url))
        .route("/urls/:id/checks", post(handlers::create_check))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
