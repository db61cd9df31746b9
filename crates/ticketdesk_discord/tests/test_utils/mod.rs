//! Shared helpers for the Discord client tests.
//!
//! Retry timings are scaled down so the pipeline's schedule can be observed
//! in milliseconds rather than seconds.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::ApiBase;
use ticketdesk_discord::{ClientOptions, DiscordHttpClient};
use ticketdesk_rate_limit::{GlobalRateLimit, RetryPolicy};
use wiremock::MockServer;

/// Bot token every test client authenticates with.
pub const TOKEN: &str = "test-token";

/// Three attempts, 100ms backoff base, 100ms default cooldown.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::builder()
        .max_attempts(3)
        .backoff_base(Duration::from_millis(100))
        .default_retry_after(Duration::from_millis(100))
        .build()
}

/// Options pointing at `base_url` with the fast policy.
pub fn options_for(base_url: &str) -> ClientOptions {
    ClientOptions::default()
        .with_api(ApiBase::new(base_url, 10))
        .with_retry(fast_policy())
        .with_request_timeout(Duration::from_secs(5))
}

/// Client for the mock server sharing `gate`.
pub fn client_with_gate(server: &MockServer, gate: Arc<GlobalRateLimit>) -> DiscordHttpClient {
    DiscordHttpClient::new(TOKEN, options_for(&server.uri()), gate)
        .expect("Failed to build test client")
}

/// Client for the mock server with a gate of its own.
pub fn client_for(server: &MockServer) -> DiscordHttpClient {
    client_with_gate(server, GlobalRateLimit::shared())
}

/// Number of requests the mock server has seen so far.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
