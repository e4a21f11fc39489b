// SPDX-License-Identifier: MIT

//! Telegram Bot API client.
//!
//! Handles:
//! - Sending HTML-formatted messages to a chat
//! - Registering and removing the inbound webhook
//!
//! `send_message` deliberately returns a bool instead of a Result: the
//! reminder path and the command handler log a failed send and move on,
//! never surfacing it to the end user.

use std::time::Duration;

use crate::error::AppError;

/// Uniform timeout for all outbound HTTP calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TelegramClient {
    /// Create a new client. A `None` token is allowed; every call will
    /// then fail with a configuration error (checked lazily, per call).
    pub fn new(token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: "https://api.telegram.org".to_string(),
            token,
        }
    }

    fn method_url(&self, method: &str) -> Result<String, AppError> {
        let token = self
            .token
            .as_deref()
            .ok_or(crate::config::ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        Ok(format!("{}/bot{}/{}", self.base_url, token, method))
    }

    /// Send an HTML-formatted message to a chat.
    ///
    /// Returns true on success. Any failure (unset token, transport
    /// error, non-2xx from Telegram) is logged and reported as false.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> bool {
        let url = match self.method_url("sendMessage") {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, chat_id, "Cannot send message");
                return false;
            }
        };

        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        match self.http.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(chat_id, "Message sent");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(chat_id, status = %status, body = %body, "Telegram rejected message");
                false
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Failed to send message");
                false
            }
        }
    }

    /// Register the webhook URL with Telegram. Returns Telegram's JSON reply.
    pub async fn set_webhook(&self, webhook_url: &str) -> Result<serde_json::Value, AppError> {
        let url = self.method_url("setWebhook")?;
        self.call_json(&url, &[("url", webhook_url)]).await
    }

    /// Remove the registered webhook. Returns Telegram's JSON reply.
    pub async fn delete_webhook(&self) -> Result<serde_json::Value, AppError> {
        let url = self.method_url("deleteWebhook")?;
        self.call_json(&url, &[]).await
    }

    async fn call_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, AppError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Telegram(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| AppError::Telegram(format!("JSON parse error: {}", e)))
    }
}
