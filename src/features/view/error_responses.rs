use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tower_sessions::session::Error as SessionError;

use crate::data::models::ViewError;

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        let status = match self {
            ViewError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            ViewError::SessionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        ViewError::SessionError(err.to_string())
    }
}
