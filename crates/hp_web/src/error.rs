use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hp_core::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Remediation hint rendered alongside prediction failures.
pub const SCHEMA_HINT: &str =
    "Check that the input column names match the training-time schema exactly.";

#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, hint) = match &self.0 {
            Error::UnknownModel(_) => (StatusCode::NOT_FOUND, None),
            Error::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, None),
            Error::Prediction(_) => (StatusCode::INTERNAL_SERVER_ERROR, Some(SCHEMA_HINT)),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        if status.is_server_error() {
            tracing::error!("prediction request failed: {}", self.0);
        }
        let mut body = json!({
            "error": self.0.to_string(),
            "status": status.as_u16(),
        });
        if let Some(hint) = hint {
            body["hint"] = json!(hint);
        }
        (status, Json(body)).into_response()
    }
}
