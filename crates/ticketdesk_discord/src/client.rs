//! Rate-limited Discord REST client.

use derive_getters::Getters;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::{ApiBase, HttpMethod, Route};
use ticketdesk_error::{ApiError, ApiErrorKind, ApiResult};
use ticketdesk_rate_limit::{GlobalRateLimit, RateLimitSignal, ResponseClass, RetryPolicy};
use tracing::{debug, error, instrument, warn};

/// Per-attempt network timeout used unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/crumplecup/ticketdesk, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Connection settings for [`DiscordHttpClient`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ticketdesk_core::ApiBase;
/// use ticketdesk_discord::ClientOptions;
/// use ticketdesk_rate_limit::RetryPolicy;
///
/// let options = ClientOptions::default()
///     .with_api(ApiBase::new("http://127.0.0.1:8080", 10))
///     .with_retry(RetryPolicy::builder().max_attempts(5).build())
///     .with_request_timeout(Duration::from_secs(5));
///
/// assert_eq!(*options.retry().max_attempts(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ClientOptions {
    /// Base URL and API version
    api: ApiBase,
    /// Retry budget and backoff
    retry: RetryPolicy,
    /// Network timeout for each attempt
    request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api: ApiBase::default(),
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientOptions {
    /// Overrides the API base.
    pub fn with_api(mut self, api: ApiBase) -> Self {
        self.api = api;
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Authenticated Discord REST client with global rate-limit coordination.
///
/// Cloning is cheap and every clone shares the same connection pool and
/// [`GlobalRateLimit`]. Clients built for the same bot token should be given
/// the same gate so a global 429 seen by one holds back all of them.
///
/// # Request pipeline
///
/// 1. The payload is serialized up front; failure is
///    [`ApiErrorKind::InvalidPayload`] and nothing is sent.
/// 2. An active global cooldown is waited out.
/// 3. Up to `max_attempts` attempts are made:
///    - 2xx returns the parsed JSON body (`null` for 204)
///    - 500/502/503/504 back off `base * 2^attempt` and retry
///    - 429 waits `retry_after`, engaging the shared gate when `global`
///    - 403, 404, other 5xx and other statuses fail immediately
/// 4. Running out of attempts is [`ApiErrorKind::RetryExhausted`].
///
/// Transport failures, including the per-attempt timeout, are returned
/// immediately and never retried.
#[derive(Clone)]
pub struct DiscordHttpClient {
    http: Client,
    token: Arc<str>,
    options: ClientOptions,
    gate: Arc<GlobalRateLimit>,
}

impl std::fmt::Debug for DiscordHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordHttpClient")
            .field("token", &"<redacted>")
            .field("options", &self.options)
            .field("gate", &self.gate)
            .finish()
    }
}

impl DiscordHttpClient {
    /// Creates a client for `token` that coordinates through `gate`.
    ///
    /// # Errors
    ///
    /// Returns `ClientBuild` if the HTTP client cannot be constructed.
    #[instrument(skip(token, gate), fields(base_url = %options.api().base_url()))]
    pub fn new(
        token: impl Into<String>,
        options: ClientOptions,
        gate: Arc<GlobalRateLimit>,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                ApiError::new(ApiErrorKind::ClientBuild(e.to_string()))
            })?;

        let token: String = token.into();
        debug!("Created Discord HTTP client");
        Ok(Self {
            http,
            token: Arc::from(token),
            options,
            gate,
        })
    }

    /// Creates a client with default options and a gate of its own.
    ///
    /// # Errors
    ///
    /// Returns `ClientBuild` if the HTTP client cannot be constructed.
    pub fn from_token(token: impl Into<String>) -> ApiResult<Self> {
        Self::new(token, ClientOptions::default(), GlobalRateLimit::shared())
    }

    /// The shared global rate-limit gate.
    pub fn gate(&self) -> &Arc<GlobalRateLimit> {
        &self.gate
    }

    /// Connection settings.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends `route` with an optional JSON payload and returns the parsed body.
    ///
    /// # Errors
    ///
    /// See the pipeline description on [`DiscordHttpClient`].
    #[instrument(skip(self, payload), fields(route = %route))]
    pub async fn request<P>(&self, route: &Route, payload: Option<&P>) -> ApiResult<Value>
    where
        P: Serialize + ?Sized,
    {
        let body = encode(payload)?;
        self.send_with_retries(route, body)
            .await
            .map(|(_, value)| value)
    }

    /// Sends `route` without a body.
    pub async fn execute(&self, route: &Route) -> ApiResult<Value> {
        self.request::<Value>(route, None).await
    }

    /// Sends `route` and decodes the response into `R`.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request), plus `ResponseFormat` when the JSON
    /// does not match `R`.
    pub async fn request_as<P, R>(&self, route: &Route, payload: Option<&P>) -> ApiResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(payload)?;
        let (status, value) = self.send_with_retries(route, body).await?;
        serde_json::from_value(value).map_err(|e| {
            error!(error = %e, "Response does not match expected shape");
            ApiError::new(ApiErrorKind::ResponseFormat {
                status,
                message: e.to_string(),
            })
        })
    }

    /// Sends `route` without a body and decodes the response into `R`.
    pub async fn execute_as<R: DeserializeOwned>(&self, route: &Route) -> ApiResult<R> {
        self.request_as::<Value, R>(route, None).await
    }

    async fn send_with_retries(
        &self,
        route: &Route,
        body: Option<Vec<u8>>,
    ) -> ApiResult<(u16, Value)> {
        let policy = self.options.retry;
        let url = self.options.api.url(route);

        let waited = self.gate.wait().await;
        if !waited.is_zero() {
            debug!(waited_ms = waited.as_millis() as u64, "Resumed after global rate limit");
        }

        let mut last_status = 0;
        for attempt in 0..*policy.max_attempts() {
            let final_attempt = policy.is_final_attempt(attempt);
            debug!(attempt, url = %url, "Sending Discord request");

            let response = self.send_once(route.method(), &url, body.as_deref()).await?;
            let status = response.status().as_u16();
            last_status = status;

            match ResponseClass::of(status) {
                ResponseClass::Success => return parse_success(status, response).await,
                ResponseClass::RetryableServerError => {
                    if final_attempt {
                        warn!(status, attempt, "Server error on final attempt");
                    } else {
                        let delay = policy.backoff(attempt);
                        warn!(
                            status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Server error, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                ResponseClass::RateLimited => {
                    let raw = response.bytes().await.map_err(|e| {
                        error!(error = ?e, "Failed to read rate limit body");
                        ApiError::new(ApiErrorKind::Transport(e.to_string()))
                    })?;
                    let signal = RateLimitSignal::from_body(&raw, *policy.default_retry_after());
                    let retry_after = *signal.retry_after();

                    if *signal.global() {
                        warn!(
                            retry_after_ms = retry_after.as_millis() as u64,
                            "Global rate limit hit"
                        );
                        if final_attempt {
                            self.gate.record(retry_after);
                        } else {
                            self.gate.engage(retry_after).await;
                        }
                    } else {
                        debug!(
                            retry_after_ms = retry_after.as_millis() as u64,
                            "Bucket rate limit hit"
                        );
                        if !final_attempt {
                            tokio::time::sleep(retry_after).await;
                        }
                    }
                }
                ResponseClass::Forbidden => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(fail(ApiErrorKind::Forbidden { body }));
                }
                ResponseClass::NotFound => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(fail(ApiErrorKind::NotFound { body }));
                }
                ResponseClass::ServerError => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(fail(ApiErrorKind::ServerError { status, body }));
                }
                ResponseClass::ClientError => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(fail(ApiErrorKind::HttpStatus { status, body }));
                }
            }
        }

        Err(fail(ApiErrorKind::RetryExhausted {
            attempts: *policy.max_attempts(),
            last_status,
        }))
    }

    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&[u8]>,
    ) -> ApiResult<Response> {
        let mut builder = self
            .http
            .request(to_reqwest(method), url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            builder = builder.body(body.to_vec());
        }

        builder.send().await.map_err(|e| {
            error!(error = ?e, "Network request failed");
            ApiError::new(ApiErrorKind::Transport(e.to_string()))
        })
    }
}

fn encode<P: Serialize + ?Sized>(payload: Option<&P>) -> ApiResult<Option<Vec<u8>>> {
    payload
        .map(serde_json::to_vec)
        .transpose()
        .map_err(|e| {
            error!(error = %e, "Payload is not valid JSON");
            ApiError::new(ApiErrorKind::InvalidPayload(e.to_string()))
        })
}

async fn parse_success(status: u16, response: Response) -> ApiResult<(u16, Value)> {
    if status == 204 {
        return Ok((status, Value::Null));
    }

    let raw = response.bytes().await.map_err(|e| {
        error!(error = ?e, "Failed to read response body");
        ApiError::new(ApiErrorKind::Transport(e.to_string()))
    })?;

    let value = serde_json::from_slice(&raw).map_err(|e| {
        error!(status, error = %e, "Invalid JSON response");
        ApiError::new(ApiErrorKind::ResponseFormat {
            status,
            message: e.to_string(),
        })
    })?;

    Ok((status, value))
}

#[track_caller]
fn fail(kind: ApiErrorKind) -> ApiError {
    error!(error = %kind, "Discord request failed");
    ApiError::new(kind)
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let client = DiscordHttpClient::from_token("super-secret").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest(HttpMethod::Put), Method::PUT);
        assert_eq!(to_reqwest(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            *ClientOptions::default().request_timeout(),
            Duration::from_secs(30)
        );
    }
}
