//! Error types for WAPI operations.
//!
//! Every failure the client can report is a variant of [`Error`]: remote
//! rejections, undecodable responses, invalid caller input, failed
//! prerequisite lookups and transport problems.

use thiserror::Error;

/// Main error type for WAPI operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// WAPI answered with a non-success status and an error message
    #[error("WAPI error {status}: {message}")]
    RemoteApi {
        /// HTTP status code returned by the server
        status: u16,
        /// The `text` field of the WAPI error body
        message: String,
    },

    /// Response body was not the JSON that was expected
    #[error("Malformed WAPI response: {0}")]
    MalformedResponse(String),

    /// Record type outside the supported set
    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(String),

    /// Invalid input for a specific operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No record matched the lookup that preceded an operation
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// No network matched the lookup that preceded an operation
    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request URL could not be formed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// WAPI endpoint could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Specialized result type for WAPI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::UnsupportedRecordType(_) => "UNSUPPORTED_RECORD_TYPE",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::NetworkNotFound(_) => "NETWORK_NOT_FOUND",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// HTTP status of a remote rejection, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
