//! Local validation errors raised before any request is sent.

use derive_getters::Getters;

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// HTTP verb outside GET, POST, PUT and DELETE.
    #[display("Method must be one of PUT, POST, GET, or DELETE (got {_0})")]
    UnsupportedMethod(String),

    /// Channel name empty or longer than 100 characters.
    #[display("Channel name must be between 1 and 100 characters (got {_0})")]
    ChannelNameLength(usize),

    /// Channel topic longer than 1024 characters.
    #[display("Channel topic must be at most 1024 characters (got {_0})")]
    ChannelTopicLength(usize),

    /// Slowmode outside 0..=21600 seconds.
    #[display("Rate limit per user must be between 0 and 21600 seconds (got {_0})")]
    SlowmodeOutOfRange(u32),

    /// Message with neither content nor embeds.
    #[display("Message must have content or at least one embed")]
    EmptyMessage,

    /// Snowflake id that is not an unsigned integer.
    #[display("Invalid snowflake id: {_0}")]
    InvalidSnowflake(String),

    /// Required field missing or blank.
    #[display("Required field '{_0}' is missing or empty")]
    MissingField(String),
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use ticketdesk_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::ChannelNameLength(101));
/// assert!(format!("{}", err).contains("between 1 and 100"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
