use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream throttling (HTTP 429).
    #[error("Rate limited by indicator provider: {0}")]
    RateLimited(String),

    /// Any other non-success response from an indicator fetch.
    #[error("Fetching {indicator} failed: {status} - {body}")]
    FetchFailed {
        indicator: String,
        status: u16,
        body: String,
    },

    /// Every requested series came back empty.
    #[error("No indicator data found in response")]
    NoData,

    #[error("A refresh is already in progress")]
    RefreshInProgress,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl AppError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::FetchFailed { .. } | AppError::Reqwest(_) | AppError::NoData => {
                StatusCode::BAD_GATEWAY
            }
            AppError::RefreshInProgress => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Internal(_)
            | AppError::Storage(_)
            | AppError::SerdeJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
