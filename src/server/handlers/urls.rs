//! URL submission, listing and detail handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use serde::Deserialize;

use super::super::error::AppError;
use super::super::flash::Flash;
use super::super::template_structs::{IndexTemplate, Notice, UrlRow, UrlShowTemplate, UrlsTemplate};
use super::super::AppState;
use super::helpers::{parse_id, redirect_with_flash, render_page, take_notice};
use crate::services::{SubmitError, SubmitOutcome};

pub const URL_EXISTS: &str = "Page already exists";
pub const URL_ADDED: &str = "Page successfully added";
pub const URL_ADD_FAILED: &str = "An error occurred while adding the URL";

/// Submission form body.
#[derive(Debug, Deserialize)]
pub struct SubmitUrlForm {
    pub url: Option<String>,
}

/// Submit a URL: redirect to its page, or re-render the form with an error.
pub async fn create_url(State(state): State<AppState>, Form(form): Form<SubmitUrlForm>) -> Response {
    match state.service.submit_url(form.url.as_deref()).await {
        Ok(outcome) => {
            let flash = match outcome {
                SubmitOutcome::Existing(_) => Flash::info(URL_EXISTS),
                SubmitOutcome::Created(_) => Flash::success(URL_ADDED),
            };
            redirect_with_flash(&state, &format!("/urls/{}", outcome.id()), &flash)
        }
        Err(e) => {
            let message = match &e {
                SubmitError::Invalid(invalid) => invalid.message(),
                SubmitError::Store(db) => {
                    tracing::error!("Failed to add URL: {}", db);
                    URL_ADD_FAILED.to_string()
                }
            };
            let template = IndexTemplate {
                notice: Some(Notice::from(Flash::error(message))),
                url_value: form.url.unwrap_or_default(),
            };
            render_page(StatusCode::UNPROCESSABLE_ENTITY, &template, false)
        }
    }
}

/// All URLs with their latest check.
pub async fn list_urls(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let listings = state.service.list().await?;
    let (notice, had_flash) = take_notice(&state, &headers);

    let template = UrlsTemplate {
        notice,
        rows: listings.iter().map(UrlRow::from).collect(),
    };
    Ok(render_page(StatusCode::OK, &template, had_flash))
}

/// One URL with its check history.
pub async fn show_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let detail = state.service.detail(id).await?.ok_or(AppError::NotFound)?;
    let (notice, had_flash) = take_notice(&state, &headers);

    let template = UrlShowTemplate::new(notice, &detail.url, &detail.checks);
    Ok(render_page(StatusCode::OK, &template, had_flash))
}
