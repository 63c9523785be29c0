// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default request timeout applied to every outgoing HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Endpoints ---
    /// Base URL of the app backend (auth endpoints live under it)
    pub api_base_url: String,
    /// Base URL of the Nominatim-compatible geocoder
    pub geocoder_base_url: String,
    /// User-Agent sent to the geocoder (Nominatim rejects anonymous clients)
    pub user_agent: String,
    /// Upper bound for any single HTTP round-trip
    pub request_timeout: Duration,

    // --- Local storage ---
    /// Directory holding sealed credentials
    pub data_dir: PathBuf,
    /// Device secret the credential sealing key is derived from
    pub device_secret: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            geocoder_base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: default_user_agent(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            data_dir: PathBuf::from(".gezgin"),
            device_secret: b"test_device_secret_32_bytes_min!".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let request_timeout = match env::var("GEZGIN_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ConfigError::Invalid("GEZGIN_REQUEST_TIMEOUT_SECS", raw.clone())
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid("GEZGIN_REQUEST_TIMEOUT_SECS", raw));
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url: env::var("GEZGIN_API_BASE_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string()),
            geocoder_base_url: env::var("GEZGIN_GEOCODER_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            user_agent: env::var("GEZGIN_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
            request_timeout,
            data_dir: env::var("GEZGIN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".gezgin")),

            // Secret - never defaulted outside tests
            device_secret: env::var("GEZGIN_DEVICE_SECRET")
                .map(|v| v.trim().as_bytes().to_vec())
                .map_err(|_| ConfigError::Missing("GEZGIN_DEVICE_SECRET"))?,
        })
    }
}

fn default_user_agent() -> String {
    format!("gezgin-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Strip trailing slashes so paths can be appended with `format!`.
fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("GEZGIN_DEVICE_SECRET", "  device-secret  ");
        env::set_var("GEZGIN_API_BASE_URL", "http://10.0.2.2:3000/api/");
        env::set_var("GEZGIN_REQUEST_TIMEOUT_SECS", "7");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.device_secret, b"device-secret");
        assert_eq!(config.api_base_url, "http://10.0.2.2:3000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(7));
        assert!(config.user_agent.starts_with("gezgin-client/"));

        env::remove_var("GEZGIN_API_BASE_URL");
        env::remove_var("GEZGIN_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url(" https://x.org// "), "https://x.org");
        assert_eq!(trim_base_url("https://x.org"), "https://x.org");
    }
}
