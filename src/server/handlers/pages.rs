//! Landing page handler.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::super::template_structs::IndexTemplate;
use super::super::AppState;
use super::helpers::{render_page, take_notice};

/// Landing page with the submission form.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (notice, had_flash) = take_notice(&state, &headers);
    let template = IndexTemplate {
        notice,
        url_value: String::new(),
    };
    render_page(StatusCode::OK, &template, had_flash)
}
