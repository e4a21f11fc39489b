//! Application configuration loaded from environment variables.
//!
//! Provider secrets are optional at startup: the endpoints that need them
//! report a configuration error per-request instead of failing boot.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// Telegram bot token
    pub telegram_bot_token: Option<String>,
    /// Public base URL used to build the OAuth redirect and webhook URLs
    pub base_url: String,
    /// HMAC key for signing the OAuth state parameter (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .ok()
                .map(|v| v.trim().to_string()),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .ok()
                .map(|v| v.trim().to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .map(|v| v.trim().to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .unwrap_or_else(|_| "dev-signing-key-change-in-production".to_string())
                .into_bytes(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Google client ID, or a configuration error for the caller to surface.
    pub fn require_google_client_id(&self) -> Result<&str, ConfigError> {
        self.google_client_id
            .as_deref()
            .ok_or(ConfigError::Missing("GOOGLE_CLIENT_ID"))
    }

    /// Google client secret, or a configuration error for the caller to surface.
    pub fn require_google_client_secret(&self) -> Result<&str, ConfigError> {
        self.google_client_secret
            .as_deref()
            .ok_or(ConfigError::Missing("GOOGLE_CLIENT_SECRET"))
    }

    /// Bot token, or a configuration error for the caller to surface.
    pub fn require_telegram_bot_token(&self) -> Result<&str, ConfigError> {
        self.telegram_bot_token
            .as_deref()
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: Some("test_client_id".to_string()),
            google_client_secret: Some("test_client_secret".to_string()),
            telegram_bot_token: Some("test_bot_token".to_string()),
            base_url: "http://localhost:8080".to_string(),
            session_signing_key: b"test_signing_key_32_bytes_min!!".to_vec(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_helpers() {
        let mut config = Config::test_default();
        assert_eq!(config.require_google_client_id().unwrap(), "test_client_id");
        assert_eq!(
            config.require_telegram_bot_token().unwrap(),
            "test_bot_token"
        );

        config.telegram_bot_token = None;
        assert!(config.require_telegram_bot_token().is_err());
    }
}
