//! Guild channel operations used to open support tickets.

use crate::DiscordHttpClient;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use ticketdesk_core::{
    Channel, ChannelKind, Embed, MANAGE_TICKET_PERMISSIONS, MessageSpec, PermissionOverwrite,
    Route, Snowflake, TextChannelSpec, TextChannelSpecBuilder, TicketRequest,
};
use ticketdesk_error::{DeskResult, ValidationError, ValidationErrorKind};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Discord refuses more than 50 channels under one category.
pub const MAX_CHANNELS_PER_CATEGORY: usize = 50;

/// Sidebar colour of the ticket opening embed.
pub const TICKET_EMBED_COLOR: u32 = 0x00ff00;

const MAX_CATEGORY_NAME_LEN: usize = 100;

#[derive(Serialize)]
struct CreateTextChannel<'a> {
    #[serde(rename = "type")]
    kind: ChannelKind,
    #[serde(flatten)]
    spec: &'a TextChannelSpec,
}

#[derive(Serialize)]
struct CreateCategory<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: ChannelKind,
    permission_overwrites: Vec<PermissionOverwrite>,
}

/// Ticket channel management for one guild.
///
/// Tickets live in text channels grouped under "ticket categories". When
/// every known category is full a new one is created, visible only to the
/// support team role, and remembered for later tickets. Clones share the
/// category list.
#[derive(Debug, Clone)]
pub struct TicketChannels {
    client: DiscordHttpClient,
    guild_id: Snowflake,
    support_role: Snowflake,
    categories: Arc<RwLock<Vec<Snowflake>>>,
}

impl TicketChannels {
    /// Creates the channel manager.
    pub fn new(
        client: DiscordHttpClient,
        guild_id: Snowflake,
        support_role: Snowflake,
        categories: Vec<Snowflake>,
    ) -> Self {
        Self {
            client,
            guild_id,
            support_role,
            categories: Arc::new(RwLock::new(categories)),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &DiscordHttpClient {
        &self.client
    }

    /// Guild the tickets are opened in.
    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    /// Ticket categories known so far, in assignment order.
    pub async fn categories(&self) -> Vec<Snowflake> {
        self.categories.read().await.clone()
    }

    fn guild_channels(&self) -> String {
        format!("guilds/{}/channels", self.guild_id)
    }

    /// Creates a text channel after checking Discord's field limits.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any request is made.
    #[instrument(skip(self, spec), fields(name = %spec.name()))]
    pub async fn create_text_channel(&self, spec: &TextChannelSpec) -> DeskResult<Channel> {
        spec.validate()?;
        let body = CreateTextChannel {
            kind: ChannelKind::GuildText,
            spec,
        };
        let channel: Channel = self
            .client
            .request_as(&Route::post(self.guild_channels()), Some(&body))
            .await?;
        debug!(channel_id = %channel.id(), "Created text channel");
        Ok(channel)
    }

    /// Every channel in the guild.
    #[instrument(skip(self))]
    pub async fn channels(&self) -> DeskResult<Vec<Channel>> {
        let channels: Vec<Channel> = self
            .client
            .execute_as(&Route::get(self.guild_channels()))
            .await?;
        debug!(count = channels.len(), "Fetched guild channels");
        Ok(channels)
    }

    /// Channels directly under `category`.
    #[instrument(skip(self))]
    pub async fn category_channels(&self, category: Snowflake) -> DeskResult<Vec<Channel>> {
        Ok(self
            .channels()
            .await?
            .into_iter()
            .filter(|channel| channel.is_in_category(category))
            .collect())
    }

    /// First known ticket category with room for another channel.
    #[instrument(skip(self))]
    pub async fn available_ticket_category(&self) -> DeskResult<Option<Snowflake>> {
        let categories = self.categories().await;
        self.first_with_room(&categories).await
    }

    async fn first_with_room(&self, categories: &[Snowflake]) -> DeskResult<Option<Snowflake>> {
        if categories.is_empty() {
            return Ok(None);
        }

        let channels = self.channels().await?;
        let available = categories.iter().copied().find(|category| {
            let used = channels
                .iter()
                .filter(|channel| channel.is_in_category(*category))
                .count();
            used < MAX_CHANNELS_PER_CATEGORY
        });
        Ok(available)
    }

    /// Creates a category hidden from `@everyone` and open to the support role.
    ///
    /// # Errors
    ///
    /// Names must be 1 to 100 characters.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> DeskResult<Channel> {
        let name_len = name.chars().count();
        if name_len == 0 || name_len > MAX_CATEGORY_NAME_LEN {
            return Err(
                ValidationError::new(ValidationErrorKind::ChannelNameLength(name_len)).into(),
            );
        }

        // The @everyone role shares the guild's id.
        let body = CreateCategory {
            name,
            kind: ChannelKind::GuildCategory,
            permission_overwrites: vec![
                PermissionOverwrite::allow_role(self.support_role, MANAGE_TICKET_PERMISSIONS),
                PermissionOverwrite::deny_role(self.guild_id, MANAGE_TICKET_PERMISSIONS),
            ],
        };
        let category: Channel = self
            .client
            .request_as(&Route::post(self.guild_channels()), Some(&body))
            .await?;
        info!(category_id = %category.id(), "Created ticket category");
        Ok(category)
    }

    /// Picks the category for the next ticket, creating one when all are full.
    ///
    /// Concurrent calls are serialized so at most one new category is
    /// created per overflow.
    #[instrument(skip(self))]
    pub async fn assign_category(&self) -> DeskResult<Snowflake> {
        let mut categories = self.categories.write().await;
        if let Some(category) = self.first_with_room(&categories).await? {
            return Ok(category);
        }

        let name = format!("Category {}", categories.len() + 1);
        let category = *self.create_category(&name).await?.id();
        categories.push(category);
        Ok(category)
    }

    /// Posts a message to `channel`.
    ///
    /// # Errors
    ///
    /// A message with neither content nor embeds is rejected before sending.
    #[instrument(skip(self, message))]
    pub async fn send_message(
        &self,
        channel: Snowflake,
        message: &MessageSpec,
    ) -> DeskResult<Value> {
        message.validate()?;
        let route = Route::post(format!("channels/{}/messages", channel));
        Ok(self.client.request(&route, Some(message)).await?)
    }

    /// Opens a ticket: assigns a category, creates the ticket channel and
    /// posts the opening embed. Returns the new channel's id.
    #[instrument(skip(self, ticket), fields(kind = %ticket.kind(), user = %ticket.user().username()))]
    pub async fn create_ticket(&self, ticket: &TicketRequest) -> DeskResult<Snowflake> {
        ticket.validate()?;
        let category = self.assign_category().await?;

        let spec = TextChannelSpecBuilder::default()
            .name(ticket.channel_name())
            .category(category)
            .build()?;
        let channel = self.create_text_channel(&spec).await?;
        let channel_id = *channel.id();

        let user = ticket.user();
        let embed = Embed::new()
            .with_title(ticket.title())
            .with_description(ticket.description())
            .with_color(TICKET_EMBED_COLOR)
            .with_field(
                "User",
                format!(
                    "Username: {}\nUser ID: {}\nEmail: {}",
                    user.username(),
                    user.id(),
                    user.email()
                ),
                true,
            )
            .with_footer(format!("{} Ticket", ticket.kind_title()));
        let message = MessageSpec::text(format!(
            "Ticket created by {} (<@&{}>)",
            user.username(),
            self.support_role
        ))
        .with_embed(embed);

        self.send_message(channel_id, &message).await?;
        info!(channel_id = %channel_id, category_id = %category, "Opened ticket");
        Ok(channel_id)
    }
}
