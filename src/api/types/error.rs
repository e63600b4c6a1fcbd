//! Error responder: maps classified errors to redacted HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::TraversalStatus;
use crate::domain::{DomainError, ErrorKind};

/// Public error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    Unauthorized,
    AccessForbidden,
    FileNotFound,
    InternalServerError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccessForbidden => StatusCode::FORBIDDEN,
            Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed client-facing message
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request is invalid or malformed.",
            Self::Unauthorized => "A valid API key with the required permissions is needed.",
            Self::AccessForbidden => "You do not have permission to access this file.",
            Self::FileNotFound => "The requested file could not be found.",
            Self::InternalServerError => "An unexpected error occurred.",
        }
    }
}

/// Error payload: `{status, code, message, details?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    /// Create a new API error with the fixed message for `code`
    pub fn new(code: ErrorCode) -> Self {
        let status = code.status();

        Self {
            status,
            response: ErrorResponse {
                status: status.as_u16(),
                code,
                message: code.message().to_string(),
                details: None,
            },
        }
    }

    /// Attach service-authored detail
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.response.details = Some(details.into());
        self
    }

    /// Bad request error
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest).with_details(details)
    }

    /// Missing, unknown or insufficiently scoped API key
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized)
    }

    /// Permission error
    pub fn forbidden() -> Self {
        Self::new(ErrorCode::AccessForbidden)
    }

    /// Not found error
    pub fn not_found() -> Self {
        Self::new(ErrorCode::FileNotFound)
    }

    /// Internal server error
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalServerError)
    }

    /// Map a classified error, applying the traversal status policy
    ///
    /// Only `InvalidArgument` detail reaches the client; every other kind is
    /// rendered from the fixed message table.
    pub fn from_domain(err: &DomainError, traversal: TraversalStatus) -> Self {
        match err.kind() {
            ErrorKind::InvalidArgument => Self::bad_request(err.message()),
            ErrorKind::DirectoryTraversalAttempt => match traversal {
                TraversalStatus::BadRequest => Self::new(ErrorCode::InvalidRequest),
                TraversalStatus::Forbidden => Self::forbidden(),
            },
            ErrorKind::PermissionDenied => Self::forbidden(),
            ErrorKind::FileNotFound | ErrorKind::NotFound => Self::not_found(),
            ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal error");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_domain(&err, TraversalStatus::default())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(err: DomainError) -> ApiError {
        ApiError::from_domain(&err, TraversalStatus::BadRequest)
    }

    #[test]
    fn test_mapping_table() {
        let cases = [
            (DomainError::invalid_argument("x"), 400, ErrorCode::InvalidRequest),
            (DomainError::directory_traversal("x"), 400, ErrorCode::InvalidRequest),
            (DomainError::permission_denied("x"), 403, ErrorCode::AccessForbidden),
            (DomainError::file_not_found("x"), 404, ErrorCode::FileNotFound),
            (DomainError::not_found("x"), 404, ErrorCode::FileNotFound),
            (DomainError::internal("x"), 500, ErrorCode::InternalServerError),
        ];

        for (err, status, code) in cases {
            let api = map(err);
            assert_eq!(api.status.as_u16(), status);
            assert_eq!(api.response.status, status);
            assert_eq!(api.response.code, code);
        }
    }

    #[test]
    fn test_traversal_forbidden_policy() {
        let api = ApiError::from_domain(
            &DomainError::directory_traversal("x"),
            TraversalStatus::Forbidden,
        );
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.response.code, ErrorCode::AccessForbidden);
    }

    #[test]
    fn test_unauthorized() {
        let api = ApiError::unauthorized();
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.response.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_no_detail_leaks() {
        let api = map(DomainError::internal(
            "probing '/srv/cdn/secret' failed: Input/output error",
        ));
        let json = serde_json::to_string(&api.response).unwrap();

        assert!(!json.contains("/srv/cdn"));
        assert!(!json.contains("details"));
        assert!(json.contains("An unexpected error occurred."));

        let api = map(DomainError::file_not_found("'/srv/cdn/a.txt' does not exist"));
        assert!(api.response.details.is_none());
        assert_eq!(api.response.message, "The requested file could not be found.");
    }

    #[test]
    fn test_invalid_argument_keeps_details() {
        let api = map(DomainError::invalid_argument("At least one permission is required"));
        assert_eq!(
            api.response.details.as_deref(),
            Some("At least one permission is required")
        );
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(&ApiError::not_found().response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": 404,
                "code": "FILE_NOT_FOUND",
                "message": "The requested file could not be found."
            })
        );
    }
}
