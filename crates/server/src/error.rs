//! Unified error handling for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::warehouse::ValidationError;

/// Application-level error type for the back-office service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Inventory backend operation failed.
    #[error("Inventory backend error: {0}")]
    Inventory(#[from] InventoryError),

    /// Local precondition failed before any backend call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_) | Self::Inventory(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Inventory(InventoryError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            // Semantic rejections from the backend keep a client-errish
            // status so the operator sees them as their own mistake.
            Self::Inventory(InventoryError::Api { status, .. }) if *status < 500 => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Inventory(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Surface backend rejection reasons; don't expose internal detail.
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Inventory(InventoryError::NotFound(what)) => format!("Not found: {what}"),
            Self::Inventory(InventoryError::Api { status, message }) if *status < 500 => {
                message.clone()
            }
            Self::Inventory(_) => "Inventory backend error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
