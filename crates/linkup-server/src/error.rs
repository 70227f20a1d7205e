use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use linkup_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Record not found".to_string())
            }
            ServerError::Store(StoreError::InvalidFilter(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string())
            }
            ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
