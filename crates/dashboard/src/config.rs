//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DASHBOARD_DATABASE_URL` - `SQLite` store for sessions and client state (default: `sqlite://dashboard.db?mode=rwc`)
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3000)
//! - `DASHBOARD_BASE_URL` - Public URL; `https://` enables secure cookies (default: `http://localhost:3000`)
//! - `FLEET_API_URL` - Shipments endpoint (default: `http://127.0.0.1:5000/shipments`)
//! - `GEOCODER_URL` - Nominatim-compatible search endpoint (default: `https://nominatim.openstreetmap.org/search`)
//! - `GEOCODER_USER_AGENT` - User-Agent sent to the geocoder (default: `fleet-logistics-dashboard/<version>`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite://dashboard.db?mode=rwc";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/shipments";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `SQLite` database for sessions, the user directory and the geocode cache
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Shipments API endpoint (`.../shipments`)
    pub api_url: Url,
    /// Geocoding service
    pub geocoder: GeocoderConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Geocoding service configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Search endpoint
    pub url: Url,
    /// User-Agent header (Nominatim rejects anonymous clients)
    pub user_agent: String,
}

impl GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: get_url("GEOCODER_URL", DEFAULT_GEOCODER_URL)?,
            user_agent: get_env_or_default("GEOCODER_USER_AGENT", &default_user_agent()),
        })
    }
}

fn default_user_agent() -> String {
    format!("fleet-logistics-dashboard/{}", env!("CARGO_PKG_VERSION"))
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_env_or_default(
            "DASHBOARD_DATABASE_URL",
            DEFAULT_DATABASE_URL,
        ));
        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("DASHBOARD_BASE_URL", "http://localhost:3000");
        let api_url = get_url("FLEET_API_URL", DEFAULT_API_URL)?;
        let geocoder = GeocoderConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            api_url,
            geocoder,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for tests and embedded use.
    #[must_use]
    pub fn local(database_url: &str, api_url: Url, geocoder_url: Url) -> Self {
        Self {
            database_url: SecretString::from(database_url),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost".to_string(),
            api_url,
            geocoder: GeocoderConfig {
                url: geocoder_url,
                user_agent: default_user_agent(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a URL-valued environment variable with a default.
fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> DashboardConfig {
        DashboardConfig::local(
            "sqlite::memory:",
            Url::parse(DEFAULT_API_URL).unwrap(),
            Url::parse(DEFAULT_GEOCODER_URL).unwrap(),
        )
    }

    #[test]
    fn test_defaults_parse() {
        assert!(Url::parse(DEFAULT_API_URL).is_ok());
        assert!(Url::parse(DEFAULT_GEOCODER_URL).is_ok());
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://fleet.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(config().geocoder.user_agent.starts_with("fleet-logistics-dashboard/"));
    }

    #[test]
    fn test_socket_addr() {
        let mut config = config();
        config.port = 3000;
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }
}
