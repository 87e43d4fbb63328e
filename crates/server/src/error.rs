use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sarmobi_guide_lib::views::UnknownRoute;
use shared::{ErrorBody, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error(transparent)]
    UnknownRoute(#[from] UnknownRoute),
    /// The session rejected the action
    #[error("{0}")]
    Guide(String),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) | ApiError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            ApiError::Guide(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::UnknownRoute(_) => "unknown_route",
            ApiError::Guide(_) => "action_rejected",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("Request failed: {self}");
        (
            self.status(),
            Json(ErrorResponse {
                error: ErrorBody {
                    code: self.code().to_string(),
                    message: self.to_string(),
                },
            }),
        )
            .into_response()
    }
}
