use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ledger::domain::transactions::BulkInsertRequestError;

/// Errors returned by request handlers.
///
/// The only bad request is a bulk insert body without a `transactions` array.
/// Database errors are passed to the client verbatim. Handlers are expected to
/// log them before converting them.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Database(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorRep { error })).into_response()
            }
            Self::Database(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep {
                    error: error.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::Database(error)
    }
}

impl From<BulkInsertRequestError> for ApiError {
    fn from(error: BulkInsertRequestError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
pub struct ErrorRep {
    pub error: String,
}
