//! Message embeds and outgoing message bodies.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use ticketdesk_error::{ValidationError, ValidationErrorKind};

/// A name/value pair rendered inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct EmbedField {
    name: String,
    value: String,
    #[serde(default)]
    inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct EmbedFooter {
    text: String,
}

/// Rich embed attached to a message.
///
/// # Examples
///
/// ```
/// use ticketdesk_core::Embed;
///
/// let embed = Embed::new()
///     .with_title("Printer on fire")
///     .with_color(0x00ff00)
///     .with_field("User", "Username: alice", false)
///     .with_footer("Support Ticket");
///
/// let json = serde_json::to_value(&embed).unwrap();
/// assert_eq!(json["color"], 0x00ff00);
/// assert_eq!(json["fields"][0]["name"], "User");
/// assert!(json.get("description").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter>,
}

impl Embed {
    /// An empty embed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the sidebar colour (0xRRGGBB).
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Appends a field.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }
}

/// Body of `POST channels/{id}/messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MessageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed>,
}

impl MessageSpec {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    /// Adds an embed.
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// A message must carry content or at least one embed.
    ///
    /// # Errors
    ///
    /// Returns `EmptyMessage` otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_content = self.content.as_deref().is_some_and(|c| !c.is_empty());
        if !has_content && self.embeds.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyMessage));
        }
        Ok(())
    }
}
