//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    /// Token authentication is enabled only when a secret is configured
    pub jwt: Option<JwtConfig>,
    pub realtime: RealtimeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// What to do when a connection's outbound queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Discard the frame that did not fit
    Drop,
    /// Close the slow connection
    #[default]
    Disconnect,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "disconnect" => Ok(Self::Disconnect),
            other => Err(format!("expected 'drop' or 'disconnect', got '{other}'")),
        }
    }
}

/// Realtime core tuning
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    /// Seconds without an inbound frame before the connection is closed; 0 disables
    #[serde(default)]
    pub idle_timeout_secs: u64,
    #[serde(default)]
    pub require_auth: bool,
    #[serde(default)]
    pub enforce_membership: bool,
}

impl RealtimeConfig {
    /// Idle timeout as a duration, `None` when reads block indefinitely
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_queue: default_outbound_queue(),
            overflow_policy: OverflowPolicy::default(),
            idle_timeout_secs: 0,
            require_auth: false,
            enforce_membership: false,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-realtime".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_outbound_queue() -> usize {
    100
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => Some(JwtConfig {
                secret,
                access_token_expiry: parse_or(
                    &lookup,
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry(),
                )?,
            }),
            None => None,
        };

        let realtime = RealtimeConfig {
            outbound_queue: parse_or(&lookup, "REALTIME_OUTBOUND_QUEUE", default_outbound_queue())?,
            overflow_policy: parse_or(
                &lookup,
                "REALTIME_OVERFLOW_POLICY",
                OverflowPolicy::default(),
            )?,
            idle_timeout_secs: parse_or(&lookup, "REALTIME_IDLE_TIMEOUT_SECS", 0)?,
            require_auth: parse_or(&lookup, "REALTIME_REQUIRE_AUTH", false)?,
            enforce_membership: parse_or(&lookup, "REALTIME_ENFORCE_MEMBERSHIP", false)?,
        };

        if realtime.outbound_queue == 0 {
            return Err(ConfigError::InvalidValue(
                "REALTIME_OUTBOUND_QUEUE",
                "must be greater than zero".to_string(),
            ));
        }
        if realtime.require_auth && jwt.is_none() {
            return Err(ConfigError::MissingVar("JWT_SECRET"));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or(&lookup, "APP_ENV", default_env())?,
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: lookup("GATEWAY_PORT")
                    .ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        ConfigError::InvalidValue("GATEWAY_PORT", e.to_string())
                    })?,
            },
            jwt,
            realtime,
        })
    }

    /// Configuration for tests and local tooling: loopback, ephemeral port, no auth
    #[must_use]
    pub fn local() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            gateway: ServerConfig {
                host: default_host(),
                port: 0,
            },
            jwt: None,
            realtime: RealtimeConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
