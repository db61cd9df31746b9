//! Discord REST routes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ticketdesk_error::{ValidationError, ValidationErrorKind};

/// Discord REST API base URL.
pub const DISCORD_API_URL: &str = "https://discord.com/api";

/// Discord REST API version.
pub const API_VERSION: u8 = 10;

/// HTTP verbs accepted by the request pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Parses a verb, rejecting anything outside GET, POST, PUT and DELETE.
    ///
    /// # Examples
    ///
    /// ```
    /// use ticketdesk_core::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::parse("POST").unwrap(), HttpMethod::Post);
    /// assert!(HttpMethod::parse("PATCH").is_err());
    /// ```
    pub fn parse(method: &str) -> Result<Self, ValidationError> {
        HttpMethod::from_str(method).map_err(|_| {
            ValidationError::new(ValidationErrorKind::UnsupportedMethod(method.to_string()))
        })
    }
}

/// An immutable `(method, endpoint)` pair.
///
/// The endpoint never carries a leading slash; the full URL is derived from
/// an [`ApiBase`].
///
/// # Examples
///
/// ```
/// use ticketdesk_core::{ApiBase, HttpMethod, Route};
///
/// let route = Route::new(HttpMethod::Get, "/guilds/42/channels");
/// assert_eq!(route.endpoint(), "guilds/42/channels");
/// assert_eq!(
///     ApiBase::default().url(&route),
///     "https://discord.com/api/v10/guilds/42/channels"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    method: HttpMethod,
    endpoint: String,
}

impl Route {
    /// Creates a route, stripping leading slashes from the endpoint.
    pub fn new(method: HttpMethod, endpoint: impl AsRef<str>) -> Self {
        Self {
            method,
            endpoint: endpoint.as_ref().trim_start_matches('/').to_string(),
        }
    }

    /// Creates a route from a textual verb.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedMethod` for verbs other than GET, POST, PUT and DELETE.
    pub fn parse(method: &str, endpoint: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self::new(HttpMethod::parse(method)?, endpoint))
    }

    /// GET route.
    pub fn get(endpoint: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// POST route.
    pub fn post(endpoint: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    /// PUT route.
    pub fn put(endpoint: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    /// DELETE route.
    pub fn delete(endpoint: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// The HTTP verb.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The endpoint path, without a leading slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method, self.endpoint)
    }
}

/// Base URL and version segment that routes are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ApiBase {
    /// Scheme and host, plus any path prefix (e.g. `https://discord.com/api`)
    #[serde(default = "default_base_url")]
    base_url: String,
    /// API version number inserted as `v{version}`
    #[serde(default = "default_version")]
    version: u8,
}

fn default_base_url() -> String {
    DISCORD_API_URL.to_string()
}

fn default_version() -> u8 {
    API_VERSION
}

impl Default for ApiBase {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
        }
    }
}

impl ApiBase {
    /// Creates a base for a custom host (proxies, mock servers).
    pub fn new(base_url: impl Into<String>, version: u8) -> Self {
        Self {
            base_url: base_url.into(),
            version,
        }
    }

    /// Full request URL for a route.
    pub fn url(&self, route: &Route) -> String {
        format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            route.endpoint()
        )
    }
}
