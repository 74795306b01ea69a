use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("All fields are required")]
    ValidationFailed,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// An extractor (JSON body, query string) refused the request.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ValidationFailed => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Terminal stage: every forwarded error ends up as `{ "message": ... }`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut message = self.to_string();
        if message.is_empty() {
            message = "Server Error".to_string();
        }

        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "Request failed");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
