use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application error carrying the HTTP status to surface and the underlying
/// cause. Authorization failures use distinct statuses: a missing or invalid
/// credential is 401, a valid credential with the wrong role is 403.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: anyhow::Error,
}

impl AppError {
    pub fn new(status: StatusCode, err: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request(err: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn not_found(err: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// Database failures surface as 500; callers map constraint violations
    /// to more specific statuses before reaching for this.
    pub fn database(err: impl Into<anyhow::Error>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.error.to_string() });
        (self.status, Json(payload)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
