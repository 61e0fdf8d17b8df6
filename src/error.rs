use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the indicator engine and signal generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Empty series, non-monotonic dates or non-positive prices.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The latest value of `indicator` is undefined because the series is
    /// shorter than its warm-up window.
    #[error("Insufficient history: {indicator} is not available for the latest bar")]
    InsufficientHistory { indicator: &'static str },
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Analysis(AnalysisError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Analysis(AnalysisError::InsufficientHistory { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Reqwest(_) => StatusCode::BAD_GATEWAY,
            AppError::SerdeJson(_) => StatusCode::BAD_GATEWAY,
            AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
