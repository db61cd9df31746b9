//! ticketdesk - Discord helpdesk bridge
//!
//! Support tickets opened on a web frontend become Discord text channels that
//! agents work from Discord. Every Discord REST call goes through one
//! rate-limited client that coordinates global cooldowns across all callers
//! and retries transient failures.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ticketdesk::{DeskConfig, GlobalRateLimit, TicketRequestBuilder, TicketUser, UserRole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeskConfig::load()?;
//!     config.validate()?;
//!
//!     let client = config.client(GlobalRateLimit::shared())?;
//!     let desk = config.ticket_channels(client)?;
//!
//!     let ticket = TicketRequestBuilder::default()
//!         .title("Cannot log in")
//!         .description("Password reset mail never arrives")
//!         .user(TicketUser::new("17", "alice", "alice@example.com", UserRole::Customer))
//!         .build()?;
//!
//!     let channel = desk.create_ticket(&ticket).await?;
//!     println!("Opened ticket channel {}", channel);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `ticketdesk_error` - Error types
//! - `ticketdesk_core` - Routes, ids and Discord JSON models
//! - `ticketdesk_rate_limit` - Global gate, retry policy, 429 parsing
//! - `ticketdesk_discord` - HTTP client and ticket channel operations
//!
//! This crate (`ticketdesk`) re-exports everything and adds configuration,
//! logging setup and the `ticketdesk` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use config::{ApiSettings, DeskConfig, DiscordSettings, RetrySettings};
pub use observability::{
    ObservabilityConfig, init_observability_with_config, shutdown_observability,
};

// Re-export workspace crates
pub use ticketdesk_core::*;
pub use ticketdesk_discord::*;
pub use ticketdesk_error::*;
pub use ticketdesk_rate_limit::*;
