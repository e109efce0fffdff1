//! Response helpers shared by the page handlers.

use askama::Template;
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use super::super::error::AppError;
use super::super::flash::{cookie_value, Flash, CLEAR_FLASH_COOKIE, FLASH_COOKIE};
use super::super::template_structs::Notice;
use super::super::AppState;

/// Take the pending notice from the request, if any.
///
/// Returns the notice and whether a flash cookie was sent at all, so the
/// response can clear it even when it failed verification.
pub fn take_notice(state: &AppState, headers: &HeaderMap) -> (Option<Notice>, bool) {
    let present = cookie_value(headers, FLASH_COOKIE).is_some();
    let notice = state.flash_key.read(headers).map(Notice::from);
    (notice, present)
}

/// Render a template with `status`, clearing a consumed flash cookie.
pub fn render_page(status: StatusCode, template: &impl Template, clear_flash: bool) -> Response {
    let body = template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e));
    let mut response = (status, Html(body)).into_response();
    if clear_flash {
        response.headers_mut().insert(
            header::SET_COOKIE,
            header::HeaderValue::from_static(CLEAR_FLASH_COOKIE),
        );
    }
    response
}

/// 302 to `location`, carrying `flash` to the next page.
pub fn redirect_with_flash(state: &AppState, location: &str, flash: &Flash) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, state.flash_key.set_cookie(flash)),
        ],
    )
        .into_response()
}

/// Parse a numeric path id. Anything else is treated as an unknown page.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}
