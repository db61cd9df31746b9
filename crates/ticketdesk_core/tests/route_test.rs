//! Tests for routes and request specs.

use ticketdesk_core::{ApiBase, HttpMethod, Route, Snowflake, TextChannelSpecBuilder};
use ticketdesk_error::ValidationErrorKind;

#[test]
fn test_leading_slashes_are_stripped() {
    assert_eq!(Route::get("/guilds/1").endpoint(), "guilds/1");
    assert_eq!(Route::get("//guilds/1").endpoint(), "guilds/1");
    assert_eq!(Route::get("guilds/1").endpoint(), "guilds/1");
}

#[test]
fn test_url_uses_base_and_version() {
    let route = Route::post("channels/55/messages");
    assert_eq!(
        ApiBase::default().url(&route),
        "https://discord.com/api/v10/channels/55/messages"
    );

    let local = ApiBase::new("http://127.0.0.1:9000/", 9);
    assert_eq!(local.url(&route), "http://127.0.0.1:9000/v9/channels/55/messages");
}

#[test]
fn test_parse_accepts_the_four_verbs() {
    for (text, method) in [
        ("GET", HttpMethod::Get),
        ("POST", HttpMethod::Post),
        ("PUT", HttpMethod::Put),
        ("DELETE", HttpMethod::Delete),
    ] {
        assert_eq!(Route::parse(text, "x").unwrap().method(), method);
    }
}

#[test]
fn test_parse_rejects_other_verbs() {
    let err = Route::parse("PATCH", "channels/1").unwrap_err();
    assert_eq!(
        err.kind(),
        &ValidationErrorKind::UnsupportedMethod("PATCH".to_string())
    );
}

#[test]
fn test_channel_spec_limits() {
    let name_err = TextChannelSpecBuilder::default()
        .name("")
        .build()
        .unwrap_err();
    assert_eq!(name_err.kind(), &ValidationErrorKind::ChannelNameLength(0));

    let topic_err = TextChannelSpecBuilder::default()
        .name("ok")
        .topic("t".repeat(1025))
        .build()
        .unwrap_err();
    assert_eq!(topic_err.kind(), &ValidationErrorKind::ChannelTopicLength(1025));

    let slowmode_err = TextChannelSpecBuilder::default()
        .name("ok")
        .rate_limit_per_user(21_601u32)
        .build()
        .unwrap_err();
    assert_eq!(
        slowmode_err.kind(),
        &ValidationErrorKind::SlowmodeOutOfRange(21_601)
    );

    let missing = TextChannelSpecBuilder::default().build().unwrap_err();
    assert!(matches!(missing.kind(), ValidationErrorKind::MissingField(_)));
}

#[test]
fn test_channel_spec_omits_unset_fields() {
    let spec = TextChannelSpecBuilder::default()
        .name("billing-alice")
        .category(Snowflake::new(900))
        .build()
        .unwrap();

    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["name"], "billing-alice");
    assert_eq!(json["parent_id"], "900");
    assert_eq!(json["nsfw"], false);
    assert!(json.get("topic").is_none());
    assert!(json.get("position").is_none());
}
