//! Configuration loading for ticketdesk.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from ticketdesk.toml)
//! - `~/.config/ticketdesk/ticketdesk.toml`
//! - `./ticketdesk.toml`
//! - `TICKETDESK__SECTION__KEY` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::{API_VERSION, ApiBase, DISCORD_API_URL, Snowflake};
use ticketdesk_discord::{ClientOptions, DEFAULT_REQUEST_TIMEOUT, DiscordHttpClient, TicketChannels};
use ticketdesk_error::{ConfigError, ConfigErrorKind, DeskResult};
use ticketdesk_rate_limit::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_AFTER, GlobalRateLimit, RetryPolicy,
};
use tracing::{debug, instrument};

/// Discord bot identity and guild layout.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct DiscordSettings {
    /// Bot token, sent as `Authorization: Bot <token>`
    #[serde(default)]
    token: String,
    /// Guild the helpdesk operates in
    #[serde(default)]
    guild_id: Option<Snowflake>,
    /// Role that staffs ticket channels
    #[serde(default)]
    support_team_role: Option<Snowflake>,
    /// Categories new ticket channels are placed under
    #[serde(default)]
    ticket_categories: Vec<Snowflake>,
}

impl std::fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("DiscordSettings")
            .field("token", &token)
            .field("guild_id", &self.guild_id)
            .field("support_team_role", &self.support_team_role)
            .field("ticket_categories", &self.ticket_categories)
            .finish()
    }
}

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ApiSettings {
    /// Scheme, host and path prefix
    #[serde(default = "default_base_url")]
    base_url: String,
    /// REST API version
    #[serde(default = "default_version")]
    version: u8,
    /// Network timeout for each attempt, in seconds
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DISCORD_API_URL.to_string()
}

fn default_version() -> u8 {
    API_VERSION
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Retry budget. Durations are fractional seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RetrySettings {
    /// Attempts per request
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    /// First server-error backoff
    #[serde(default = "default_backoff_base_secs")]
    backoff_base_secs: f64,
    /// Cooldown when a 429 omits `retry_after`
    #[serde(default = "default_retry_after_secs")]
    default_retry_after_secs: f64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_base_secs() -> f64 {
    DEFAULT_BACKOFF_BASE.as_secs_f64()
}

fn default_retry_after_secs() -> f64 {
    DEFAULT_RETRY_AFTER.as_secs_f64()
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
            default_retry_after_secs: default_retry_after_secs(),
        }
    }
}

impl ApiSettings {
    /// Per-attempt network timeout.
    ///
    /// # Errors
    ///
    /// A zero timeout would fail every attempt, so it is rejected.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "api.request_timeout_secs",
                "must be at least 1 second",
            ));
        }
        Ok(Duration::from_secs(self.request_timeout_secs))
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            key,
            format!("must be a non-negative number of seconds, got {}", value),
        ));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigError::invalid(key, format!("out of range: {}", e)))
}

impl RetrySettings {
    /// Converts to the pipeline's retry policy.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for zero attempts or negative durations.
    pub fn policy(&self) -> Result<RetryPolicy, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("retry.max_attempts", "must be at least 1"));
        }
        Ok(RetryPolicy::builder()
            .max_attempts(self.max_attempts)
            .backoff_base(seconds("retry.backoff_base_secs", self.backoff_base_secs)?)
            .default_retry_after(seconds(
                "retry.default_retry_after_secs",
                self.default_retry_after_secs,
            )?)
            .build())
    }
}

/// Complete ticketdesk configuration.
///
/// # Example
///
/// ```no_run
/// use ticketdesk::DeskConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DeskConfig::load()?;
/// config.validate()?;
/// println!("Guild: {:?}", config.discord().guild_id());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct DeskConfig {
    /// Bot identity and guild layout
    #[serde(default)]
    discord: DiscordSettings,
    /// API endpoint
    #[serde(default)]
    api: ApiSettings,
    /// Retry budget
    #[serde(default)]
    retry: RetrySettings,
}

impl DeskConfig {
    /// Load configuration from a specific file path, on top of nothing else.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DeskResult<Self> {
        debug!("Loading configuration from file");

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "{}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> DeskResult<Self> {
        Self::load_with(None)
    }

    /// Like [`load`](Self::load), with `extra` layered above the config files
    /// and below the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `extra` is missing or any present source cannot be parsed.
    #[instrument]
    pub fn load_with(extra: Option<&std::path::Path>) -> DeskResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../ticketdesk.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/ticketdesk/ticketdesk.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("ticketdesk").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TICKETDESK")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("discord.ticket_categories"),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        Ok(config)
    }

    /// Checks everything ticket operations need.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first missing or invalid setting.
    pub fn validate(&self) -> DeskResult<()> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::missing("discord.token").into());
        }
        if self.discord.guild_id.is_none() {
            return Err(ConfigError::missing("discord.guild_id").into());
        }
        if self.discord.support_team_role.is_none() {
            return Err(ConfigError::missing("discord.support_team_role").into());
        }
        if self.discord.ticket_categories.is_empty() {
            return Err(ConfigError::missing("discord.ticket_categories").into());
        }
        self.api.request_timeout()?;
        self.retry.policy()?;
        Ok(())
    }

    /// Client settings derived from the `api` and `retry` sections.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero timeout or invalid retry settings.
    pub fn client_options(&self) -> DeskResult<ClientOptions> {
        Ok(ClientOptions::default()
            .with_api(ApiBase::new(self.api.base_url.clone(), self.api.version))
            .with_retry(self.retry.policy()?)
            .with_request_timeout(self.api.request_timeout()?))
    }

    /// Builds a client sharing `gate`. Only the token is required.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when no token is configured.
    pub fn client(&self, gate: Arc<GlobalRateLimit>) -> DeskResult<DiscordHttpClient> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::missing("discord.token").into());
        }
        Ok(DiscordHttpClient::new(
            self.discord.token.clone(),
            self.client_options()?,
            gate,
        )?)
    }

    /// Builds the ticket channel manager on top of `client`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the guild or support role is missing.
    pub fn ticket_channels(&self, client: DiscordHttpClient) -> DeskResult<TicketChannels> {
        let guild = self
            .discord
            .guild_id
            .ok_or_else(|| ConfigError::missing("discord.guild_id"))?;
        let role = self
            .discord
            .support_team_role
            .ok_or_else(|| ConfigError::missing("discord.support_team_role"))?;
        Ok(TicketChannels::new(
            client,
            guild,
            role,
            self.discord.ticket_categories.clone(),
        ))
    }
}
