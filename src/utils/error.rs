//! Error handling module
//!
//! Defines the error type returned by every client operation

use crate::services::validator::ValidationError;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum CrmError {
    /// Construction error: missing credentials, malformed base URL, bad settings
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Network failure while talking to the service
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request deadline elapsed
    #[error("Request timeout")]
    Timeout,

    /// The service answered with a non-2xx status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Login reached the service but it rejected the credentials
    #[error("Authentication failed: {message}")]
    Authentication {
        code: Option<String>,
        message: String,
    },

    /// Payload does not match the expected shape, even after repair
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// One or more fields violate their declared constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service reported a failure inside an otherwise successful response
    #[error("Service error{}: {message}", code_suffix(.code))]
    Service {
        code: Option<String>,
        message: String,
    },

    /// A valid response whose expected collection is empty
    #[error("Empty result")]
    EmptyResult,
}

impl CrmError {
    /// Get a stable error kind string
    pub fn error_type(&self) -> &'static str {
        match self {
            CrmError::Config(_) => "config_error",
            CrmError::Http(_) => "transport_error",
            CrmError::Timeout => "timeout_error",
            CrmError::Status { .. } => "status_error",
            CrmError::Authentication { .. } => "authentication_error",
            CrmError::Decode(_) => "decode_error",
            CrmError::Validation(_) => "validation_error",
            CrmError::Service { .. } => "service_error",
            CrmError::EmptyResult => "empty_result",
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CrmError::Status { status, .. } => Some(*status),
            CrmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CrmError::Http(_) | CrmError::Timeout | CrmError::Status { .. }
        )
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, CrmError::Authentication { .. } | CrmError::Config(_))
    }
}

/// Map a reqwest failure, keeping timeouts distinct from other network errors
pub(crate) fn from_transport(err: reqwest::Error) -> CrmError {
    if err.is_timeout() {
        CrmError::Timeout
    } else {
        CrmError::Http(err)
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" {c}")).unwrap_or_default()
}

/// Result type alias
pub type CrmResult<T> = Result<T, CrmError>;

/// Error construction helpers
pub mod helpers {
    use super::*;

    /// Create configuration error
    pub fn config_error(message: impl Into<String>) -> CrmError {
        CrmError::Config(anyhow::anyhow!(message.into()))
    }

    /// Create authentication error
    pub fn auth_error(code: Option<String>, message: impl Into<String>) -> CrmError {
        CrmError::Authentication {
            code,
            message: message.into(),
        }
    }

    /// Create in-band service error
    pub fn service_error(code: Option<String>, message: impl Into<String>) -> CrmError {
        CrmError::Service {
            code,
            message: message.into(),
        }
    }

    /// Create status error
    pub fn status_error(status: u16, body: impl Into<String>) -> CrmError {
        CrmError::Status {
            status,
            body: body.into(),
        }
    }
}
