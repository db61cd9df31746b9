//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the ticketdesk binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{assign_category, list_channels, open_ticket, raw_request};
