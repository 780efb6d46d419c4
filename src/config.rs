//! Configuration management for the CRM follow-up server.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file. Nothing here writes to stdout, which carries the MCP protocol.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Session user recorded as caller and deal owner when none is configured.
pub const DEFAULT_SESSION_USER: &str = "Administrator";

/// Configuration for the CRM follow-up server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CRM site, e.g. `https://crm.example.com`
    pub crm_api_url: String,

    /// API key of the integration user
    pub crm_api_key: String,

    /// API secret of the integration user
    pub crm_api_secret: String,

    /// User recorded as caller on call logs and as owner of intake deals
    pub session_user: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// How long the holiday calendar is reused before reloading (default: 60)
    pub holiday_cache_ttl_minutes: u64,

    /// Buffered realtime events per subscriber (default: 64)
    pub event_channel_capacity: usize,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `CRM_API_BASE_URL`: Base URL of the CRM site
    /// - `CRM_API_KEY`: API key for token authentication
    /// - `CRM_API_SECRET`: API secret for token authentication
    ///
    /// Optional environment variables:
    /// - `CRM_SESSION_USER`: Acting user (default: "Administrator")
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `HOLIDAY_CACHE_TTL_MINUTES`: Holiday calendar cache TTL (default: 60)
    /// - `EVENT_CHANNEL_CAPACITY`: Realtime event buffer size (default: 64)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env if present
        let _ = dotenvy::dotenv();

        let crm_api_url = Self::required("CRM_API_BASE_URL")?;
        let crm_api_key = Self::required("CRM_API_KEY")?;
        let crm_api_secret = Self::required("CRM_API_SECRET")?;

        if !crm_api_url.starts_with("http://") && !crm_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "CRM_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        for (var, value) in [("CRM_API_KEY", &crm_api_key), ("CRM_API_SECRET", &crm_api_secret)] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: var.to_string(),
                    reason: "Cannot be empty".to_string(),
                });
            }
        }

        let session_user = env::var("CRM_SESSION_USER")
            .ok()
            .filter(|user| !user.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_USER.to_string());

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let holiday_cache_ttl_minutes = Self::parse_env_u64("HOLIDAY_CACHE_TTL_MINUTES", 60)?;
        let event_channel_capacity = Self::parse_env_usize("EVENT_CHANNEL_CAPACITY", 64)?;

        if event_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                var: "EVENT_CHANNEL_CAPACITY".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            crm_api_url,
            crm_api_key,
            crm_api_secret,
            session_user,
            request_timeout,
            holiday_cache_ttl_minutes,
            event_channel_capacity,
            log_level,
        })
    }

    fn required(var_name: &str) -> ConfigResult<String> {
        env::var(var_name).map_err(|_| ConfigError::MissingVar(var_name.to_string()))
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crm_api_url: String::new(),
            crm_api_key: String::new(),
            crm_api_secret: String::new(),
            session_user: DEFAULT_SESSION_USER.to_string(),
            request_timeout: 10,
            holiday_cache_ttl_minutes: 60,
            event_channel_capacity: 64,
            log_level: "error".to_string(),
        }
    }
}
