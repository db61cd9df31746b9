//! Discord channel models.

use crate::Snowflake;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use ticketdesk_error::{ValidationError, ValidationErrorKind};

/// VIEW_CHANNEL (1024) | SEND_MESSAGES (2048).
pub const MANAGE_TICKET_PERMISSIONS: u64 = 3072;

pub(crate) const MAX_NAME_LEN: usize = 100;
const MAX_TOPIC_LEN: usize = 1024;
const MAX_SLOWMODE_SECS: u32 = 21_600;

/// Discord channel type.
///
/// Only the types the helpdesk creates get their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    /// Type 0
    GuildText,
    /// Type 4
    GuildCategory,
    /// Any other channel type
    Other(u8),
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => ChannelKind::GuildText,
            4 => ChannelKind::GuildCategory,
            other => ChannelKind::Other(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::GuildText => 0,
            ChannelKind::GuildCategory => 4,
            ChannelKind::Other(other) => other,
        }
    }
}

/// A guild channel as returned by the REST API.
///
/// Fields the helpdesk never reads are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Channel {
    /// Channel id
    id: Snowflake,
    /// Channel type
    #[serde(rename = "type")]
    kind: ChannelKind,
    /// Owning guild
    #[serde(default)]
    guild_id: Option<Snowflake>,
    /// Channel name
    #[serde(default)]
    name: Option<String>,
    /// Channel topic
    #[serde(default)]
    topic: Option<String>,
    /// Sort position
    #[serde(default)]
    position: Option<i32>,
    /// Parent category
    #[serde(default)]
    parent_id: Option<Snowflake>,
    /// Age-restricted
    #[serde(default)]
    nsfw: Option<bool>,
    /// Slowmode in seconds
    #[serde(default)]
    rate_limit_per_user: Option<u32>,
}

impl Channel {
    /// True when this channel sits directly under `category`.
    pub fn is_in_category(&self, category: Snowflake) -> bool {
        self.parent_id == Some(category)
    }
}

/// Whether an overwrite targets a role or a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OverwriteKind {
    /// Type 0
    Role,
    /// Type 1
    Member,
}

impl From<u8> for OverwriteKind {
    fn from(value: u8) -> Self {
        if value == 1 {
            OverwriteKind::Member
        } else {
            OverwriteKind::Role
        }
    }
}

impl From<OverwriteKind> for u8 {
    fn from(kind: OverwriteKind) -> Self {
        match kind {
            OverwriteKind::Role => 0,
            OverwriteKind::Member => 1,
        }
    }
}

/// Channel permission overwrite. Bitsets travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PermissionOverwrite {
    /// Role or member id
    id: Snowflake,
    /// Target kind
    #[serde(rename = "type")]
    kind: OverwriteKind,
    /// Allowed permission bits
    allow: String,
    /// Denied permission bits
    deny: String,
}

impl PermissionOverwrite {
    /// Grants `bits` to a role.
    pub fn allow_role(role: Snowflake, bits: u64) -> Self {
        Self {
            id: role,
            kind: OverwriteKind::Role,
            allow: bits.to_string(),
            deny: "0".to_string(),
        }
    }

    /// Revokes `bits` from a role.
    pub fn deny_role(role: Snowflake, bits: u64) -> Self {
        Self {
            id: role,
            kind: OverwriteKind::Role,
            allow: "0".to_string(),
            deny: bits.to_string(),
        }
    }
}

/// Parameters for creating a guild text channel.
///
/// Unset optional fields are omitted from the request body.
///
/// # Examples
///
/// ```
/// use ticketdesk_core::{Snowflake, TextChannelSpecBuilder};
///
/// let spec = TextChannelSpecBuilder::default()
///     .name("support-alice")
///     .category(Snowflake::new(42))
///     .build()
///     .unwrap();
/// assert_eq!(spec.name(), "support-alice");
///
/// let too_long = TextChannelSpecBuilder::default().name("x".repeat(101)).build();
/// assert!(too_long.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder, Getters)]
#[builder(
    setter(into, strip_option),
    build_fn(private, name = "build_internal")
)]
pub struct TextChannelSpec {
    /// Channel name (1-100 characters)
    name: String,
    /// Channel topic (at most 1024 characters)
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    /// Slowmode in seconds (0-21600)
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_limit_per_user: Option<u32>,
    /// Sort position
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<u32>,
    /// Parent category
    #[builder(default)]
    #[serde(rename = "parent_id", default, skip_serializing_if = "Option::is_none")]
    category: Option<Snowflake>,
    /// Age-restricted
    #[builder(default)]
    #[serde(default)]
    nsfw: bool,
}

impl TextChannelSpec {
    /// Checks Discord's field limits.
    ///
    /// # Errors
    ///
    /// Returns the first limit violated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(ValidationError::new(
                ValidationErrorKind::ChannelNameLength(name_len),
            ));
        }

        if let Some(topic) = &self.topic {
            let topic_len = topic.chars().count();
            if topic_len > MAX_TOPIC_LEN {
                return Err(ValidationError::new(
                    ValidationErrorKind::ChannelTopicLength(topic_len),
                ));
            }
        }

        if let Some(slowmode) = self.rate_limit_per_user {
            if slowmode > MAX_SLOWMODE_SECS {
                return Err(ValidationError::new(
                    ValidationErrorKind::SlowmodeOutOfRange(slowmode),
                ));
            }
        }

        Ok(())
    }
}

impl TextChannelSpecBuilder {
    /// Builds and validates the spec.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when no name was set, or the first field limit violated.
    pub fn build(&self) -> Result<TextChannelSpec, ValidationError> {
        let spec = self
            .build_internal()
            .map_err(|e| ValidationError::new(ValidationErrorKind::MissingField(e.to_string())))?;
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_round_trips_through_u8() {
        assert_eq!(ChannelKind::from(4), ChannelKind::GuildCategory);
        assert_eq!(u8::from(ChannelKind::Other(13)), 13);
    }

    #[test]
    fn test_channel_ignores_unknown_fields() {
        let channel: Channel = serde_json::from_str(
            r#"{"id":"10","type":0,"parent_id":"4","flags":0,"last_message_id":null}"#,
        )
        .unwrap();
        assert!(channel.is_in_category(Snowflake::new(4)));
        assert_eq!(*channel.kind(), ChannelKind::GuildText);
    }

    #[test]
    fn test_overwrite_serializes_bits_as_strings() {
        let json = serde_json::to_value(PermissionOverwrite::deny_role(
            Snowflake::new(7),
            MANAGE_TICKET_PERMISSIONS,
        ))
        .unwrap();
        assert_eq!(json["deny"], "3072");
        assert_eq!(json["allow"], "0");
        assert_eq!(json["type"], 0);
        assert_eq!(json["id"], "7");
    }
}
