//! Client error types.

use dompet_core::access::AccessError;
use dompet_core::budget::BudgetError;
use dompet_shared::AppError;
use thiserror::Error;

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// The caller's role does not allow the action.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Client misconfiguration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Returns true for input problems the user can fix.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Budget(_) | Self::Status { status: 400 | 422, .. }
        )
    }

    /// Returns true if sending the same request again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::ExternalService(e.to_string()),
            ClientError::Status { status, message } => Self::from_status(status, message),
            ClientError::Decode(msg) => Self::ExternalService(msg),
            ClientError::Budget(e) => e.into(),
            ClientError::Access(e) => e.into(),
            ClientError::Config(msg) => Self::Internal(msg),
        }
    }
}
