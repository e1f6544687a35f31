//! Application configuration loaded from environment variables.
//!
//! App credentials are read once at startup and kept in memory for the
//! lifetime of the process.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Facebook app ID (public)
    pub facebook_app_id: String,
    /// Facebook app secret
    pub facebook_app_secret: String,
    /// OAuth redirect URI registered with the Facebook app
    pub redirect_uri: String,
    /// Graph API base URL, including the version path segment
    pub graph_api_base: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            facebook_app_id: env::var("FACEBOOK_APP_ID")
                .map_err(|_| ConfigError::Missing("FACEBOOK_APP_ID"))?,
            facebook_app_secret: env::var("FACEBOOK_APP_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FACEBOOK_APP_SECRET"))?,
            redirect_uri: env::var("REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/auth/callback".to_string()),
            graph_api_base: env::var("GRAPH_API_BASE")
                .unwrap_or_else(|_| "https://graph.facebook.com/v19.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            facebook_app_id: "test_app_id".to_string(),
            facebook_app_secret: "test_app_secret".to_string(),
            redirect_uri: "http://localhost:8080/auth/callback".to_string(),
            graph_api_base: "https://graph.facebook.com/v19.0".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
