use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use runway_core::{ReferentialError, RunwayError};
use runway_sim::SimError;

use crate::db::BackendError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Spreadsheet error: {0}")]
    Backend(#[from] BackendError),

    #[error("Store error: {0}")]
    Store(#[from] RunwayError),

    #[error("Store corruption: {0}")]
    Referential(#[from] ReferentialError),

    #[error("Invalid run: {0}")]
    Simulation(#[from] SimError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Backend(e) => {
                tracing::error!("Spreadsheet error: {:?}", e);
                (StatusCode::BAD_GATEWAY, "Spreadsheet request failed".to_string())
            }
            AppError::Store(RunwayError::RowNotFound { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Store(RunwayError::AssociationNotFound { .. }) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::Store(RunwayError::Referential(e)) | AppError::Referential(e) => {
                tracing::error!("Store corruption, reload required: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Simulation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
