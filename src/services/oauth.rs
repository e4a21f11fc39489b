// SPDX-License-Identifier: MIT

//! Google OAuth flow: authorization URL construction, signed state
//! parameter, and code-for-token exchange.
//!
//! The state parameter replaces a server-side session: it carries the
//! initiating Telegram user id and chat id plus an issue timestamp,
//! HMAC-signed so the callback can trust it round-tripped untampered.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::AppError;
use crate::models::GoogleCredentials;

type HmacSha256 = Hmac<Sha256>;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// The payload carried through one authorization round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub telegram_user_id: String,
    pub chat_id: Option<i64>,
}

/// Sign an auth session into an opaque state parameter.
///
/// Format before encoding: `user_id|chat_id|timestamp_hex|signature_hex`,
/// base64url without padding.
pub fn sign_state(session: &AuthSession, key: &[u8]) -> Result<String, AppError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let chat = session.chat_id.map(|c| c.to_string()).unwrap_or_default();
    let payload = format!("{}|{}|{:x}", session.telegram_user_id, chat, timestamp);

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let signed = format!("{}|{}", payload, signature);
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify a state parameter and recover the session it carries.
///
/// Returns `None` on malformed input or a signature mismatch.
pub fn verify_state(state: &str, key: &[u8]) -> Option<AuthSession> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "user_id|chat_id|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(4, '|').collect();
    if parts.len() != 4 {
        return None;
    }

    let payload = format!("{}|{}|{}", parts[0], parts[1], parts[2]);

    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if parts[3] != expected {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(AuthSession {
        telegram_user_id: parts[0].to_string(),
        chat_id: parts[1].parse().ok(),
    })
}

/// OAuth flow handler, built per request from the app config.
pub struct OAuthFlow {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthFlow {
    /// Build the flow from config. Fails with a configuration error if
    /// the Google client id/secret are not set.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client_id = config.require_google_client_id()?.to_string();
        let client_secret = config.require_google_client_secret()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(super::telegram::HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            http,
            client_id,
            client_secret,
            redirect_uri: format!("{}/auth/google/callback", config.base_url),
        })
    }

    /// Build the Google authorization URL for the given signed state.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}\
             &access_type=offline&include_granted_scopes=true&prompt=consent&state={}",
            AUTH_ENDPOINT,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(CALENDAR_SCOPE),
            state
        )
    }

    /// Exchange an authorization code for credential material.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleCredentials, AppError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(AppError::OAuth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let tokens: TokenExchangeResponse = response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse token response: {}", e)))?;

        Ok(GoogleCredentials {
            token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_uri: TOKEN_ENDPOINT.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }
}

/// Token exchange response from Google OAuth.
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
    refresh_token: Option<String>,
}
