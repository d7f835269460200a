//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to callers, independent of transport.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or the session token expired.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied for the current workspace role.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, raised before any request leaves the client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. activating an active plan).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflicting state on the backend.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend or transport error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Local misconfiguration or bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the backend uses for this kind of failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable code shown to users next to the message.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Maps a backend HTTP status and message onto an error variant.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::Validation(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => Self::ExternalService(message),
        }
    }

    /// Returns true if resubmitting the same action may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::Internal(_))
    }
}
