//! Command handlers.

use serde_json::Value;
use std::sync::Arc;
use ticketdesk::{
    ApiError, ApiErrorKind, DeskConfig, DeskResult, GlobalRateLimit, Route, Snowflake,
    TicketRequestBuilder, TicketUser, UserRole,
};
use tracing::{info, instrument};

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

/// Sends a raw request and prints the response body.
#[instrument(skip(config, gate, payload))]
pub async fn raw_request(
    config: &DeskConfig,
    gate: Arc<GlobalRateLimit>,
    method: &str,
    endpoint: &str,
    payload: Option<&str>,
) -> DeskResult<()> {
    let route = Route::parse(method, endpoint)?;
    let payload: Option<Value> = payload
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| ApiError::new(ApiErrorKind::InvalidPayload(e.to_string())))?;

    let client = config.client(gate)?;
    let response = client.request(&route, payload.as_ref()).await?;
    print_json(&response);
    Ok(())
}

/// Lists guild channels, optionally only those under `category`.
#[instrument(skip(config, gate))]
pub async fn list_channels(
    config: &DeskConfig,
    gate: Arc<GlobalRateLimit>,
    category: Option<Snowflake>,
) -> DeskResult<()> {
    let desk = config.ticket_channels(config.client(gate)?)?;
    let channels = match category {
        Some(category) => desk.category_channels(category).await?,
        None => desk.channels().await?,
    };

    for channel in &channels {
        let parent = channel
            .parent_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}\t{}\t{}",
            channel.id(),
            channel.name().as_deref().unwrap_or("<unnamed>"),
            parent
        );
    }
    info!(count = channels.len(), "Listed channels");
    Ok(())
}

/// Prints the category the next ticket would be placed in.
#[instrument(skip(config, gate))]
pub async fn assign_category(config: &DeskConfig, gate: Arc<GlobalRateLimit>) -> DeskResult<()> {
    config.validate()?;
    let desk = config.ticket_channels(config.client(gate)?)?;
    let category = desk.assign_category().await?;
    println!("{}", category);
    Ok(())
}

/// Opens a ticket and prints the new channel id.
#[allow(clippy::too_many_arguments)]
#[instrument(skip(config, gate, description, email))]
pub async fn open_ticket(
    config: &DeskConfig,
    gate: Arc<GlobalRateLimit>,
    title: String,
    description: String,
    user_id: String,
    username: String,
    email: String,
    role: UserRole,
    kind: String,
) -> DeskResult<()> {
    config.validate()?;
    let ticket = TicketRequestBuilder::default()
        .title(title)
        .description(description)
        .user(TicketUser::new(user_id, username, email, role))
        .kind(kind)
        .build()?;

    let desk = config.ticket_channels(config.client(gate)?)?;
    let channel = desk.create_ticket(&ticket).await?;
    println!("{}", channel);
    Ok(())
}
