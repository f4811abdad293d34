//! Error handling - maps domain and infrastructure failures onto the
//! uniform `{success: false, message}` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use agora_core::error::{DomainError, RepoError};
use agora_core::ports::AuthError;
use agora_shared::ErrorResponse;

/// Application-level error type rendered by the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    /// Missing/invalid/expired credential, or its subject no longer exists.
    AuthenticationRequired,
    /// Login or current-password mismatch.
    InvalidCredentials,
    Forbidden,
    NotFound(String),
    BadRequest(String),
    /// Reset-token redemption failure.
    InvalidResetToken,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AuthenticationRequired => write!(f, "Authentication required"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InvalidResetToken => write!(f, "Invalid or expired token"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::AuthenticationRequired => {
                "Authentication required to access this resource".to_string()
            }
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Forbidden => {
                "You do not have permission to access this resource".to_string()
            }
            AppError::NotFound(detail) => detail.clone(),
            AppError::BadRequest(detail) => detail.clone(),
            AppError::InvalidResetToken => "Invalid or expired token".to_string(),
            AppError::Internal(detail) => {
                // The detail stays in the logs; the caller gets a generic line.
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::BadRequest(msg),
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::InvalidResetToken => AppError::InvalidResetToken,
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        tracing::error!("Store failure: {}", err);
        AppError::Internal("Database error".to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                AppError::AuthenticationRequired
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
