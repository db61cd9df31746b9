//! Core data types for ticketdesk.
//!
//! This crate provides the types shared by the request pipeline and the
//! ticket channel operations: Discord ids, API routes and the JSON models
//! exchanged with the Discord REST API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod embed;
mod route;
mod snowflake;
mod ticket;

pub use channel::{
    Channel, ChannelKind, MANAGE_TICKET_PERMISSIONS, OverwriteKind, PermissionOverwrite,
    TextChannelSpec, TextChannelSpecBuilder,
};
pub use embed::{Embed, EmbedField, EmbedFooter, MessageSpec};
pub use route::{API_VERSION, ApiBase, DISCORD_API_URL, HttpMethod, Route};
pub use snowflake::Snowflake;
pub use ticket::{DEFAULT_TICKET_KIND, TicketRequest, TicketRequestBuilder, TicketUser, UserRole};
