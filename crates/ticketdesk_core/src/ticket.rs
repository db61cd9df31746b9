//! Ticket opening requests.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use crate::channel::MAX_NAME_LEN;
use ticketdesk_error::{ValidationError, ValidationErrorKind};

/// Role of the person opening a ticket on the web side.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum UserRole {
    /// Regular customer
    #[default]
    Customer,
    /// Support agent
    Agent,
    /// Administrator
    Admin,
}

/// The web user a ticket belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TicketUser {
    /// Web-side user id
    id: String,
    /// Display name, also used in the channel name
    username: String,
    /// Contact address
    email: String,
    /// Web-side role
    #[serde(default)]
    role: UserRole,
}

impl TicketUser {
    /// Creates a ticket user.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            role,
        }
    }
}

/// Ticket kind used when none is given.
pub const DEFAULT_TICKET_KIND: &str = "support";

/// Everything needed to open a ticket channel.
///
/// # Examples
///
/// ```
/// use ticketdesk_core::{TicketRequestBuilder, TicketUser, UserRole};
///
/// let ticket = TicketRequestBuilder::default()
///     .title("Login broken")
///     .description("Password reset mail never arrives")
///     .user(TicketUser::new("17", "alice", "alice@example.com", UserRole::Customer))
///     .kind("billing")
///     .build()
///     .unwrap();
/// assert_eq!(ticket.channel_name(), "billing-alice");
/// assert_eq!(ticket.kind_title(), "Billing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder, Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct TicketRequest {
    /// Short summary
    title: String,
    /// Full problem statement
    description: String,
    /// Ticket owner
    user: TicketUser,
    /// Ticket category label ("support", "billing", ...)
    #[builder(default = "DEFAULT_TICKET_KIND.to_string()")]
    #[serde(default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    DEFAULT_TICKET_KIND.to_string()
}

impl TicketRequest {
    /// Channel name for this ticket: `{kind}-{username}`.
    pub fn channel_name(&self) -> String {
        format!("{}-{}", self.kind, self.user.username)
    }

    /// Kind with each word capitalised, for embed footers.
    pub fn kind_title(&self) -> String {
        self.kind
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rejects blank fields and usernames too long for a channel name.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first blank field, or
    /// `ChannelNameLength` when `{kind}-{username}` exceeds 100 characters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("username", &self.user.username),
            ("kind", &self.kind),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::MissingField(
                    field.to_string(),
                )));
            }
        }

        let name_len = self.channel_name().chars().count();
        if name_len > MAX_NAME_LEN {
            return Err(ValidationError::new(ValidationErrorKind::ChannelNameLength(
                name_len,
            )));
        }
        Ok(())
    }
}

impl TicketRequestBuilder {
    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when a required field is unset or blank.
    pub fn build(&self) -> Result<TicketRequest, ValidationError> {
        let ticket = self
            .build_internal()
            .map_err(|e| ValidationError::new(ValidationErrorKind::MissingField(e.to_string())))?;
        ticket.validate()?;
        Ok(ticket)
    }
}
