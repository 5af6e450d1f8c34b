//! Orders service configuration loaded from environment variables.

use std::time::Duration;

use common::ServerConfig;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_INVENTORY_URL: &str = "http://localhost:8081";
pub const DEFAULT_SHIPPING_URL: &str = "http://localhost:8082";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("DOWNSTREAM_TIMEOUT_MS must be a whole number of milliseconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Reads the shared server settings plus:
/// - `INVENTORY_SERVICE_URL` — base URL of the inventory service
/// - `SHIPPING_SERVICE_URL` — base URL of the shipping service
/// - `DOWNSTREAM_TIMEOUT_MS` — per-request bound on downstream calls
///   (default: unbounded)
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub inventory_url: String,
    pub shipping_url: String,
    pub downstream_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let inventory_url = service_url(&lookup, "INVENTORY_SERVICE_URL", DEFAULT_INVENTORY_URL)?;
        let shipping_url = service_url(&lookup, "SHIPPING_SERVICE_URL", DEFAULT_SHIPPING_URL)?;
        let downstream_timeout = match lookup("DOWNSTREAM_TIMEOUT_MS") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            ),
            None => None,
        };

        Ok(Self {
            server: ServerConfig::from_lookup(DEFAULT_PORT, lookup),
            inventory_url,
            shipping_url,
            downstream_timeout,
        })
    }
}

fn service_url(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default.to_string());
    };
    match reqwest::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(value),
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}
