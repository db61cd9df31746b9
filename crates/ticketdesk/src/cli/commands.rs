//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticketdesk::{DEFAULT_TICKET_KIND, Snowflake, UserRole};

/// ticketdesk - Discord helpdesk bridge
#[derive(Parser, Debug)]
#[command(name = "ticketdesk")]
#[command(about = "Open and inspect Discord support tickets through a rate-limited REST client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Extra configuration file, layered over ticketdesk.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a raw Discord REST request and print the JSON response
    Request {
        /// GET, POST, PUT or DELETE
        method: String,

        /// Endpoint below /v{version}/, e.g. guilds/123/channels
        endpoint: String,

        /// JSON request body
        #[arg(long)]
        payload: Option<String>,
    },

    /// List guild channels
    Channels {
        /// Only channels under this category
        #[arg(long)]
        category: Option<Snowflake>,
    },

    /// Print the category the next ticket goes into, creating one if all are full
    AssignCategory,

    /// Open a ticket channel and post its opening message
    OpenTicket {
        /// Ticket title
        #[arg(long)]
        title: String,

        /// Problem description
        #[arg(long)]
        description: String,

        /// Web-side user id
        #[arg(long)]
        user_id: String,

        /// Username, also used in the channel name
        #[arg(long)]
        username: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Web-side role (customer, agent, admin)
        #[arg(long, default_value = "customer")]
        role: UserRole,

        /// Ticket kind, e.g. support or billing
        #[arg(long, default_value = DEFAULT_TICKET_KIND)]
        kind: String,
    },
}
