//! Error responses for page handlers.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::template_structs::ErrorTemplate;
use crate::repository::DbError;

/// Failure that ends a request with an error page.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        tracing::error!("Database error: {}", e);
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, heading, message) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Page not found",
                "The page you are looking for does not exist.".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "Something went wrong on our side. Please try again later.".to_string(),
            ),
        };

        let template = ErrorTemplate {
            notice: None,
            status: status.as_u16(),
            heading,
            message,
        };
        let body = template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));
        (status, Html(body)).into_response()
    }
}
