//! Check handler.

use axum::{
    extract::{Path, State},
    response::Response,
};

use super::super::error::AppError;
use super::super::flash::Flash;
use super::super::AppState;
use super::helpers::{parse_id, redirect_with_flash};
use crate::services::RunCheckError;

pub const CHECK_DONE: &str = "Page successfully checked";
pub const CHECK_FAILED: &str = "An error occurred while checking";

/// Run a check for a URL and redirect back to its page.
pub async fn create_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let location = format!("/urls/{}", id);

    let flash = match state.service.run_check(id).await {
        Ok(_) => Flash::success(CHECK_DONE),
        Err(RunCheckError::NotFound(_)) => return Err(AppError::NotFound),
        Err(RunCheckError::Fetch(e)) => {
            tracing::warn!("Check for URL {} failed: {}", id, e);
            Flash::error(CHECK_FAILED)
        }
        Err(RunCheckError::Store(e)) => {
            tracing::error!("Failed to store check for URL {}: {}", id, e);
            Flash::error(CHECK_FAILED)
        }
    };

    Ok(redirect_with_flash(&state, &location, &flash))
}
