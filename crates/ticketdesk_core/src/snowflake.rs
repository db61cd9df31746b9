//! Discord snowflake ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use ticketdesk_error::{ValidationError, ValidationErrorKind};

/// A Discord snowflake id (guild, channel, role, user, message).
///
/// Discord sends ids as JSON strings to avoid precision loss in JavaScript
/// clients; both strings and bare integers are accepted when deserializing,
/// and ids are always serialized as strings.
///
/// # Examples
///
/// ```
/// use ticketdesk_core::Snowflake;
///
/// let id: Snowflake = "1234567890123".parse().unwrap();
/// assert_eq!(id.get(), 1_234_567_890_123);
/// assert_eq!(id.to_string(), "1234567890123");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    derive_more::From,
)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Wraps a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for Snowflake {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidSnowflake(s.to_string())))
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnowflake {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawSnowflake::deserialize(deserializer)? {
            RawSnowflake::Number(id) => Ok(Self(id)),
            RawSnowflake::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
