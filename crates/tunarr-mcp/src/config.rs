//! Environment-driven configuration for the MCP server.

use tunarr_core::{Error, Result};

/// Default request timeout when `TUNARR_TIMEOUT_SECONDS` is not set.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Tunarr server, e.g. `http://localhost:8000`.
    pub host: String,
    /// Per-request timeout for calls to the Tunarr server.
    pub timeout_seconds: u64,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `TUNARR_HOST` is required; startup fails without it.
    /// `TUNARR_TIMEOUT_SECONDS` is optional and falls back to the default
    /// when unset or unparseable.
    pub fn from_env() -> Result<Config> {
        let host = std::env::var("TUNARR_HOST")
            .map_err(|_| Error::Config("TUNARR_HOST is not set".to_string()))?;
        let timeout_seconds = std::env::var("TUNARR_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Ok(Config {
            host,
            timeout_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test covers every case so the env mutations never race each other.
    #[test]
    fn test_from_env() {
        std::env::remove_var("TUNARR_HOST");
        std::env::remove_var("TUNARR_TIMEOUT_SECONDS");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: TUNARR_HOST is not set");

        std::env::set_var("TUNARR_HOST", "http://localhost:8000");
        let config = Config::from_env().unwrap();
        assert_eq!(config.host, "http://localhost:8000");
        assert_eq!(config.timeout_seconds, 30);

        std::env::set_var("TUNARR_TIMEOUT_SECONDS", "5");
        let config = Config::from_env().unwrap();
        assert_eq!(config.timeout_seconds, 5);

        // Unparseable values fall back rather than failing startup.
        std::env::set_var("TUNARR_TIMEOUT_SECONDS", "fast");
        let config = Config::from_env().unwrap();
        assert_eq!(config.timeout_seconds, 30);

        std::env::remove_var("TUNARR_HOST");
        std::env::remove_var("TUNARR_TIMEOUT_SECONDS");
    }
}
