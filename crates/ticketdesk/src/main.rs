//! ticketdesk CLI binary.
//!
//! This binary provides command-line access to the helpdesk bridge:
//! - Send raw rate-limited Discord REST requests
//! - List guild and ticket category channels
//! - Assign ticket categories and open ticket channels

use clap::Parser;
use ticketdesk::{
    DeskConfig, GlobalRateLimit, ObservabilityConfig, init_observability_with_config,
    shutdown_observability,
};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, assign_category, list_channels, open_ticket, raw_request};

    // Pick up TICKETDESK__* variables from a local .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = DeskConfig::load_with(cli.config.as_deref())?;
    // One gate for every client this process creates.
    let gate = GlobalRateLimit::shared();

    match cli.command {
        Commands::Request {
            method,
            endpoint,
            payload,
        } => {
            raw_request(&config, gate, &method, &endpoint, payload.as_deref()).await?;
        }

        Commands::Channels { category } => {
            list_channels(&config, gate, category).await?;
        }

        Commands::AssignCategory => {
            assign_category(&config, gate).await?;
        }

        Commands::OpenTicket {
            title,
            description,
            user_id,
            username,
            email,
            role,
            kind,
        } => {
            open_ticket(
                &config,
                gate,
                title,
                description,
                user_id,
                username,
                email,
                role,
                kind,
            )
            .await?;
        }
    }

    shutdown_observability();
    Ok(())
}
