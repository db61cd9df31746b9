//! Discord REST request pipeline errors.

use derive_getters::Getters;

/// Terminal outcomes of a Discord API call.
///
/// Retryable conditions (rate limits, transient 5xx) never surface here
/// directly; the pipeline only reports them as [`ApiErrorKind::RetryExhausted`]
/// once the retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ApiErrorKind {
    /// Request payload could not be encoded as JSON. No request was sent.
    #[display("Invalid JSON payload: {_0}")]
    InvalidPayload(String),

    /// Network-level failure (DNS, connect, timeout, body read).
    #[display("Network request failed: {_0}")]
    Transport(String),

    /// A 2xx response whose body is not valid JSON for the expected shape.
    #[display("Invalid JSON response (HTTP {status}): {message}")]
    ResponseFormat {
        /// HTTP status code of the response
        status: u16,
        /// Parser error message
        message: String,
    },

    /// HTTP 403.
    #[display("Forbidden (HTTP 403): {body}")]
    Forbidden {
        /// Raw response body
        body: String,
    },

    /// HTTP 404.
    #[display("Not found (HTTP 404): {body}")]
    NotFound {
        /// Raw response body
        body: String,
    },

    /// A 5xx status outside the retryable set.
    #[display("Discord server error (HTTP {status}): {body}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Any other unsuccessful status (400, 401, 405, ...).
    #[display("HTTP {status} error: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Every attempt was consumed by retryable responses.
    #[display("Failed to make request to Discord after {attempts} attempts (last status {last_status})")]
    RetryExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Status of the final response
        last_status: u16,
    },

    /// The underlying HTTP client could not be constructed.
    #[display("Failed to build HTTP client: {_0}")]
    ClientBuild(String),
}

impl ApiErrorKind {
    /// HTTP status carried by this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiErrorKind::ResponseFormat { status, .. }
            | ApiErrorKind::ServerError { status, .. }
            | ApiErrorKind::HttpStatus { status, .. } => Some(*status),
            ApiErrorKind::Forbidden { .. } => Some(403),
            ApiErrorKind::NotFound { .. } => Some(404),
            ApiErrorKind::RetryExhausted { last_status, .. } => Some(*last_status),
            ApiErrorKind::InvalidPayload(_)
            | ApiErrorKind::Transport(_)
            | ApiErrorKind::ClientBuild(_) => None,
        }
    }

    /// Raw response body carried by this error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiErrorKind::Forbidden { body }
            | ApiErrorKind::NotFound { body }
            | ApiErrorKind::ServerError { body, .. }
            | ApiErrorKind::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Discord API error with source location tracking.
///
/// # Examples
///
/// ```
/// use ticketdesk_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(ApiErrorKind::NotFound { body: "{}".to_string() });
/// assert_eq!(err.kind().status(), Some(404));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    kind: ApiErrorKind,
    line: u32,
    file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<ApiErrorKind> for ApiError {
    #[track_caller]
    fn from(kind: ApiErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for Discord API calls.
pub type ApiResult<T> = Result<T, ApiError>;
