//! Ticket category assignment and ticket opening against a mock guild.

mod test_utils;

use serde_json::{Value, json};
use test_utils::{client_for, request_count};
use ticketdesk_core::{
    MessageSpec, Snowflake, TextChannelSpec, TicketRequest, TicketRequestBuilder, TicketUser,
    UserRole,
};
use ticketdesk_discord::{MAX_CHANNELS_PER_CATEGORY, TicketChannels};
use ticketdesk_error::{DeskErrorKind, ValidationErrorKind};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const GUILD: u64 = 10;
const SUPPORT_ROLE: u64 = 77;
const FULL_CATEGORY: u64 = 100;
const OPEN_CATEGORY: u64 = 200;

fn channels_under(category: u64, count: usize, first_id: u64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": (first_id + i as u64).to_string(),
                "type": 0,
                "guild_id": GUILD.to_string(),
                "name": format!("ticket-{}", i),
                "parent_id": category.to_string(),
            })
        })
        .collect()
}

async fn mount_guild_channels(server: &MockServer, channels: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/v10/guilds/{}/channels", GUILD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(channels)))
        .mount(server)
        .await;
}

fn desk(server: &MockServer, categories: Vec<u64>) -> TicketChannels {
    TicketChannels::new(
        client_for(server),
        Snowflake::new(GUILD),
        Snowflake::new(SUPPORT_ROLE),
        categories.into_iter().map(Snowflake::new).collect(),
    )
}

fn json_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body is JSON")
}

async fn posts_to(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == endpoint)
        .map(json_body)
        .collect()
}

#[tokio::test]
async fn test_available_category_skips_full_ones() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let mut channels = channels_under(FULL_CATEGORY, MAX_CHANNELS_PER_CATEGORY, 1000);
    channels.extend(channels_under(OPEN_CATEGORY, 3, 2000));
    mount_guild_channels(&server, channels).await;

    let desk = desk(&server, vec![FULL_CATEGORY, OPEN_CATEGORY]);
    assert_eq!(
        desk.available_ticket_category().await?,
        Some(Snowflake::new(OPEN_CATEGORY))
    );

    let full_only = self::desk(&server, vec![FULL_CATEGORY]);
    assert_eq!(full_only.available_ticket_category().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_category_channels_filters_by_parent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let mut channels = channels_under(FULL_CATEGORY, 4, 1000);
    channels.extend(channels_under(OPEN_CATEGORY, 2, 2000));
    mount_guild_channels(&server, channels).await;

    let desk = desk(&server, vec![]);
    let open = desk.category_channels(Snowflake::new(OPEN_CATEGORY)).await?;
    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|c| c.is_in_category(Snowflake::new(OPEN_CATEGORY))));
    Ok(())
}

#[tokio::test]
async fn test_assign_category_creates_category_when_full() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_guild_channels(
        &server,
        channels_under(FULL_CATEGORY, MAX_CHANNELS_PER_CATEGORY, 1000),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(format!("/v10/guilds/{}/channels", GUILD)))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "300",
            "type": 4,
            "guild_id": GUILD.to_string(),
            "name": "Category 2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let desk = desk(&server, vec![FULL_CATEGORY]);
    let assigned = desk.assign_category().await?;

    assert_eq!(assigned, Snowflake::new(300));
    assert_eq!(
        desk.categories().await,
        vec![Snowflake::new(FULL_CATEGORY), Snowflake::new(300)]
    );

    let created = posts_to(&server, &format!("/v10/guilds/{}/channels", GUILD)).await;
    assert_eq!(created.len(), 1);
    let body = &created[0];
    assert_eq!(body["name"], "Category 2");
    assert_eq!(body["type"], 4);
    assert_eq!(
        body["permission_overwrites"],
        json!([
            {"id": SUPPORT_ROLE.to_string(), "type": 0, "allow": "3072", "deny": "0"},
            {"id": GUILD.to_string(), "type": 0, "allow": "0", "deny": "3072"},
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_create_ticket_opens_channel_and_posts_embed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_guild_channels(&server, channels_under(OPEN_CATEGORY, 2, 2000)).await;
    Mock::given(method("POST"))
        .and(path(format!("/v10/guilds/{}/channels", GUILD)))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "555",
            "type": 0,
            "guild_id": GUILD.to_string(),
            "name": "billing-alice",
            "parent_id": OPEN_CATEGORY.to_string(),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v10/channels/555/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9001"})))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = TicketRequestBuilder::default()
        .title("Refund request")
        .description("Charged twice for March")
        .user(TicketUser::new(
            "42",
            "alice",
            "alice@example.com",
            UserRole::Customer,
        ))
        .kind("billing")
        .build()?;

    let desk = desk(&server, vec![OPEN_CATEGORY]);
    let channel = desk.create_ticket(&ticket).await?;
    assert_eq!(channel, Snowflake::new(555));

    let created = posts_to(&server, &format!("/v10/guilds/{}/channels", GUILD)).await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["name"], "billing-alice");
    assert_eq!(created[0]["type"], 0);
    assert_eq!(created[0]["parent_id"], OPEN_CATEGORY.to_string());

    let messages = posts_to(&server, "/v10/channels/555/messages").await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(message["content"], "Ticket created by alice (<@&77>)");
    let embed = &message["embeds"][0];
    assert_eq!(embed["title"], "Refund request");
    assert_eq!(embed["description"], "Charged twice for March");
    assert_eq!(embed["color"], 0x00ff00);
    assert_eq!(embed["footer"]["text"], "Billing Ticket");
    assert_eq!(embed["fields"][0]["name"], "User");
    assert_eq!(
        embed["fields"][0]["value"],
        "Username: alice\nUser ID: 42\nEmail: alice@example.com"
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_channel_spec_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let spec: TextChannelSpec =
        serde_json::from_value(json!({"name": "x".repeat(101)})).expect("spec deserializes");
    let desk = desk(&server, vec![OPEN_CATEGORY]);
    let err = desk.create_text_channel(&spec).await.unwrap_err();

    match err.kind() {
        DeskErrorKind::Validation(e) => {
            assert_eq!(e.kind(), &ValidationErrorKind::ChannelNameLength(101))
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_overlong_ticket_name_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ticket: TicketRequest = serde_json::from_value(json!({
        "title": "Locked out",
        "description": "Cannot sign in",
        "user": {"id": "7", "username": "u".repeat(120), "email": "u@example.com"},
    }))
    .expect("ticket deserializes");

    // The only known category is full, so assignment would create one.
    let desk = desk(&server, vec![FULL_CATEGORY]);
    let err = desk.create_ticket(&ticket).await.unwrap_err();

    match err.kind() {
        DeskErrorKind::Validation(e) => {
            assert_eq!(e.kind(), &ValidationErrorKind::ChannelNameLength(128))
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(request_count(&server).await, 0);
    assert_eq!(desk.categories().await, vec![Snowflake::new(FULL_CATEGORY)]);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let desk = desk(&server, vec![]);
    let err = desk
        .send_message(Snowflake::new(1), &MessageSpec::default())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), DeskErrorKind::Validation(_)));
}

#[tokio::test]
async fn test_api_errors_surface_through_desk_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Missing Access"))
        .mount(&server)
        .await;

    let desk = desk(&server, vec![OPEN_CATEGORY]);
    let err = desk.channels().await.unwrap_err();
    let api = err.as_api().expect("api error");
    assert_eq!(api.kind().status(), Some(403));
}
