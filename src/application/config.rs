use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use crate::utils::config::{get_env_or_default, get_env_or_none};
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, Default, PartialEq)]
/// Credentials used to authenticate against a service
///
/// Secrets are never serialized, so displaying a config does not leak them.
pub struct Credentials {
    /// Login name, basic auth is enabled when both this and `password` are set
    pub username: Option<String>,
    /// Password for basic auth
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Bearer token, stored for future use but not sent
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Credentials {
    /// Credentials with a username and password
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    /// No credentials at all
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The basic auth pair, only when both halves are present
    #[must_use]
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Connection settings for one remote service
pub struct ServiceConfig {
    /// Base URL every relative endpoint is appended to
    pub base_url: String,
    /// Authentication credentials
    pub credentials: Credentials,
    /// Transport timeout in seconds, `None` leaves the transport unbounded
    pub timeout: Option<u64>,
}

impl ServiceConfig {
    /// Reads `<PREFIX>_URL`, `<PREFIX>_USERNAME`, `<PREFIX>_PASSWORD`,
    /// `<PREFIX>_TOKEN` and `<PREFIX>_TIMEOUT`
    #[must_use]
    pub fn from_env(prefix: &str, default_url: &str) -> Self {
        let url_var = format!("{prefix}_URL");
        let base_url = get_env_or_default(&url_var, default_url.to_string());
        if base_url == default_url {
            error!("{} not found in environment variables or .env file", url_var);
        }

        let timeout_var = format!("{prefix}_TIMEOUT");
        let timeout = match get_env_or_default(&timeout_var, DEFAULT_TIMEOUT_SECS) {
            0 => {
                debug!("{} is 0, no transport timeout", timeout_var);
                None
            }
            secs => Some(secs),
        };

        Self {
            base_url,
            credentials: Credentials {
                username: get_env_or_none(&format!("{prefix}_USERNAME")),
                password: get_env_or_none(&format!("{prefix}_PASSWORD")),
                token: get_env_or_none(&format!("{prefix}_TOKEN")),
            },
            timeout,
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Main configuration for the Hub and Upsource clients
pub struct Config {
    /// Hub permission server
    pub hub: ServiceConfig,
    /// Upsource code review server
    pub upsource: ServiceConfig,
    /// `$top` used for Hub list endpoints
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Builds the configuration from the environment, loading `.env` first
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let mut page_size = get_env_or_default("HUB_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            error!("HUB_PAGE_SIZE must be positive, using {}", DEFAULT_PAGE_SIZE);
            page_size = DEFAULT_PAGE_SIZE;
        }

        Config {
            hub: ServiceConfig::from_env("HUB", "http://localhost:8080/hub"),
            upsource: ServiceConfig::from_env("UPSOURCE", "http://localhost:8080"),
            page_size,
        }
    }
}
