//! Top-level error wrapper types.

use crate::{ApiError, ConfigError, ValidationError};

/// Every failure the workspace can report.
///
/// # Examples
///
/// ```
/// use ticketdesk_error::{DeskError, ValidationError, ValidationErrorKind};
///
/// let err: DeskError = ValidationError::new(ValidationErrorKind::EmptyMessage).into();
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DeskErrorKind {
    /// Discord API call failed
    #[from(ApiError)]
    Api(ApiError),
    /// Input rejected before any request was sent
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// ticketdesk error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ticketdesk_error::{ConfigError, DeskResult};
///
/// fn might_fail() -> DeskResult<()> {
///     Err(ConfigError::missing("discord.guild_id"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("ticketdesk Error: {}", _0)]
pub struct DeskError(Box<DeskErrorKind>);

impl DeskError {
    /// Create a new error from a kind.
    pub fn new(kind: DeskErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DeskErrorKind {
        &self.0
    }

    /// The API error inside, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self.kind() {
            DeskErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to DeskErrorKind
impl<T> From<T> for DeskError
where
    T: Into<DeskErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for ticketdesk operations.
pub type DeskResult<T> = std::result::Result<T, DeskError>;
