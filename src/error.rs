use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Request, State,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{state::AppState, views};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Recipe {0} not found")]
    NotFound(Uuid),

    #[error("Recipe id {0:?} is not valid")]
    MalformedId(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Could not read form submission: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Expected a multipart form submission: {0}")]
    NotMultipart(#[from] MultipartRejection),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::MalformedId(_) => StatusCode::NOT_FOUND,
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::NotMultipart(e) => e.status(),
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }
        (status, views::error_page(status, &self.to_string())).into_response()
    }
}

/// Parses a path id; anything that isn't a UUID is reported like a missing record.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    (status, views::error_page(status, "Page not found")).into_response()
}

/// Outside development, swaps the body of every 5xx response for a generic
/// page so storage details stay in the logs.
pub async fn redact_server_errors(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let res = next.run(req).await;
    let status = res.status();
    if state.config.env.is_development() || !status.is_server_error() {
        return res;
    }
    (
        status,
        views::error_page(status, "Something went wrong. Please try again later."),
    )
        .into_response()
}
