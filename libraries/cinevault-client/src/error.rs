//! Error types for the CineVault client.

use cinevault_core::{CoreError, FieldError};
use thiserror::Error;

/// Every failure the data client can report.
///
/// This is the only error shape that leaves the client; transport errors are
/// normalized into it in `response.rs`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No token stored locally; the request was never sent
    #[error("No session token found. Please log in.")]
    NoSessionToken,

    /// Server answered 401: token invalid or expired, or bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Server answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server rejected the request with another 4xx status
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        field_errors: Vec<FieldError>,
    },

    /// Server answered 5xx, or sent a body that could not be decoded
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Payload failed a local precondition; the request was never sent
    #[error("Validation failed: {}", FieldError::join(.0))]
    Validation(Vec<FieldError>),
}

/// Tag identifying an [`ApiError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoSessionToken,
    Unauthorized,
    NotFound,
    Rejected,
    ServerError,
    NetworkError,
    Validation,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NoSessionToken => ErrorKind::NoSessionToken,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Rejected { .. } => ErrorKind::Rejected,
            ApiError::ServerError { .. } => ErrorKind::ServerError,
            ApiError::NetworkError(_) => ErrorKind::NetworkError,
            ApiError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Short message suitable for a notification.
    ///
    /// Field-level messages take precedence when present.
    pub fn message(&self) -> String {
        match self {
            ApiError::NoSessionToken => self.to_string(),
            ApiError::Unauthorized(msg) | ApiError::NotFound(msg) | ApiError::NetworkError(msg) => {
                msg.clone()
            }
            ApiError::Rejected {
                message,
                field_errors,
                ..
            } => {
                if field_errors.is_empty() {
                    message.clone()
                } else {
                    FieldError::join(field_errors)
                }
            }
            ApiError::ServerError { message, .. } => message.clone(),
            ApiError::Validation(errors) => FieldError::join(errors),
        }
    }

    /// Field-level messages, if the error carries any.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ApiError::Rejected { field_errors, .. } => field_errors,
            ApiError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// HTTP status, for errors that came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Rejected { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<CoreError> for ApiError {
    /// Session store failures happen while building a request; nothing was sent.
    fn from(err: CoreError) -> Self {
        ApiError::NetworkError(format!("Could not prepare request: {}", err))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_prefers_field_errors() {
        let err = ApiError::Rejected {
            status: 422,
            message: "Unprocessable".into(),
            field_errors: vec![
                FieldError::new("Username", "is required"),
                FieldError::new("Email", "does not appear to be valid"),
            ],
        };
        assert_eq!(
            err.message(),
            "Username: is required, Email: does not appear to be valid"
        );
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_validation_display() {
        let err = ApiError::Validation(vec![FieldError::new("email", "Email is required")]);
        assert_eq!(err.to_string(), "Validation failed: email: Email is required");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_core_error_becomes_network_error() {
        let err: ApiError = CoreError::storage("disk full").into();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }
}
