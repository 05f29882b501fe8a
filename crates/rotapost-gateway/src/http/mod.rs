pub mod admin;
pub mod config;
pub mod health;
pub mod manual;
pub mod scheduler;
pub mod stats;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use rotapost_core::RotapostError;

/// JSON error envelope: `{ok: false, error: CODE, message}` with a status
/// matching the taxonomy.
#[derive(Debug)]
pub struct ApiError(pub RotapostError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RotapostError::ConfigMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            RotapostError::OutOfRange { .. } | RotapostError::Config(_) => StatusCode::BAD_REQUEST,
            RotapostError::ContentNotFound { .. } => StatusCode::NOT_FOUND,
            RotapostError::Transport(_) | RotapostError::ApiRejection(_) => StatusCode::BAD_GATEWAY,
            RotapostError::Database(_) | RotapostError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({
            "ok": false,
            "error": self.0.code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<RotapostError> for ApiError {
    fn from(e: RotapostError) -> Self {
        ApiError(e)
    }
}
