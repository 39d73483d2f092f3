use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    NotFound {
        message: String,
        suggestions: Vec<String>,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Failure body shared by every API route.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, suggestions) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, None),
            AppError::NotFound {
                message,
                suggestions,
            } => (StatusCode::NOT_FOUND, message, Some(suggestions)),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };
        let body = ErrorBody {
            ok: false,
            message,
            suggestions,
        };
        (status, Json(body)).into_response()
    }
}
