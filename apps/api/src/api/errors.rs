use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::errors::DomainError;
use crate::domain::repositories::RepositoryError;
use crate::services::ServiceError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 422 Unprocessable Entity error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(_) => Self::unprocessable(err.to_string()),
            DomainError::InvalidTransition { .. } | DomainError::Conflict(_) => {
                Self::conflict(err.to_string())
            }
            DomainError::LimitExceeded(_) => Self::forbidden(err.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            RepositoryError::Conflict(message) => Self::conflict(message),
            RepositoryError::Database(detail) => {
                error!(error = %detail, "Database failure");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Repository(e) => e.into(),
            ServiceError::NotFound(_) => Self::not_found(err.to_string()),
            ServiceError::Forbidden(message) => Self::forbidden(message),
            ServiceError::Unauthorized(message) => Self::unauthorized(message),
            ServiceError::Internal(detail) => {
                error!(error = %detail, "Internal failure");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::invalid_transition("completed", "scheduled"), StatusCode::CONFLICT),
            (DomainError::conflict("taken"), StatusCode::CONFLICT),
            (DomainError::limit_exceeded("full"), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn database_details_are_not_echoed() {
        let err = ApiError::from(RepositoryError::Database("connection reset by peer".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection reset"));
    }

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(ServiceError::not_found("Team")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::forbidden("no")).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(ServiceError::Unauthorized("no".into())).status,
            StatusCode::UNAUTHORIZED
        );
        let conflict = ApiError::from(ServiceError::from(RepositoryError::Conflict(
            "Email already registered".into(),
        )));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.message, "Email already registered");
    }
}
