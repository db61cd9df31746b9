//! Discord REST access for ticketdesk.
//!
//! [`DiscordHttpClient`] is the single path every Discord REST call takes. It
//! authenticates, waits out global rate limits shared through a
//! [`GlobalRateLimit`](ticketdesk_rate_limit::GlobalRateLimit), retries
//! transient failures and turns everything else into a typed
//! [`ApiError`](ticketdesk_error::ApiError).
//!
//! [`TicketChannels`] builds the helpdesk operations on top of it: finding a
//! ticket category with room, creating categories and ticket channels, and
//! posting the opening message.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod tickets;

pub use client::{ClientOptions, DEFAULT_REQUEST_TIMEOUT, DiscordHttpClient, USER_AGENT};
pub use tickets::{MAX_CHANNELS_PER_CATEGORY, TICKET_EMBED_COLOR, TicketChannels};
