use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farelist_core::FilterError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Filter(FilterError),
    ValidationError(String),
    NotFoundError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn filter(err: FilterError) -> Self {
        Self::Filter(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Filter(err) => {
                let status =
                    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
                tracing::warn!(param = ?err.param(), "Filter request rejected: {}", err);
                (status, err.to_string())
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "status": "error",
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
