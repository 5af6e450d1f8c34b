//! Inventory service configuration loaded from environment variables.

use std::time::Duration;

use common::ServerConfig;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(1000);

/// Reads the shared server settings plus:
/// - `SIMULATED_DELAY_MS` — stall applied to `-with-delay` products
///   (default: `1000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub simulated_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            simulated_delay: lookup("SIMULATED_DELAY_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SIMULATED_DELAY),
            server: ServerConfig::from_lookup(DEFAULT_PORT, lookup),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
