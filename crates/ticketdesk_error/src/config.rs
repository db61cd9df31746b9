//! Configuration errors.

use derive_getters::Getters;

/// Ways a configuration can be unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source could not be read or deserialized.
    #[display("Failed to load configuration: {_0}")]
    Load(String),

    /// Required setting absent or empty.
    #[display("Required setting '{_0}' is missing or empty")]
    MissingSetting(String),

    /// Setting present but unusable.
    #[display("Invalid value for '{key}': {reason}")]
    InvalidSetting {
        /// Dotted setting path, e.g. `retry.max_attempts`
        key: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use ticketdesk_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingSetting("discord.token".into()));
/// assert!(format!("{}", err).contains("discord.token"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`ConfigErrorKind::MissingSetting`].
    #[track_caller]
    pub fn missing(key: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::MissingSetting(key.into()))
    }

    /// Shorthand for [`ConfigErrorKind::InvalidSetting`].
    #[track_caller]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_points_at_caller() {
        // derive-getters emits `fn file(&'static self)` for `&'static str` fields.
        let err: &'static ConfigError = Box::leak(Box::new(ConfigError::missing("discord.guild_id")));
        assert_eq!(*err.line(), line!() - 1);
        assert!(err.file().ends_with("config.rs"));
    }

    #[test]
    fn test_invalid_names_key_and_reason() {
        let err = ConfigError::invalid("retry.max_attempts", "must be at least 1");
        assert_eq!(
            err.kind(),
            &ConfigErrorKind::InvalidSetting {
                key: "retry.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            }
        );
        assert!(err.to_string().contains("retry.max_attempts"));
    }
}
