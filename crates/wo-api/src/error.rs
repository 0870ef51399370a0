//! API error handling
//!
//! Every error crossing the HTTP boundary becomes a status plus a JSON
//! message; the underlying cause is logged for diagnostics and never
//! crashes the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wo_db::RepositoryError;
use wo_import::ImportError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Validation(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} with id {} not found", resource, id))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Validation(_) => "validation_failed",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "database error");
                ApiError::Internal("database error".to_string())
            }
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Parse(msg) => {
                tracing::warn!(error = %msg, "spreadsheet rejected");
                ApiError::BadRequest(format!("Spreadsheet could not be decoded: {}", msg))
            }
            ImportError::EmptyWorkbook => {
                ApiError::BadRequest("Workbook has no worksheets".to_string())
            }
            ImportError::Backend(msg) => {
                tracing::error!(error = %msg, "import halted on backend error");
                ApiError::Internal(msg)
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: match self {
                ApiError::NotFound(msg)
                | ApiError::Unauthorized(msg)
                | ApiError::Validation(msg)
                | ApiError::BadRequest(msg)
                | ApiError::Internal(msg) => msg,
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::not_found("Package", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::unauthorized("no identity").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::validation("empty name").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::bad_request("bad multipart").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_import_error_mapping() {
        let parse: ApiError = ImportError::Parse("not a zip".into()).into();
        assert_eq!(parse.status_code(), StatusCode::BAD_REQUEST);

        let backend: ApiError = ImportError::Backend("connection reset".into()).into();
        assert_eq!(backend.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: ApiError = RepositoryError::NotFound("Package with id 9 not found".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
