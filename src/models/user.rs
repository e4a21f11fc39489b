//! User record and OAuth credential models.

use serde::{Deserialize, Serialize};

/// A linked user, keyed in the store by Telegram user id.
///
/// Created on a successful OAuth callback and replaced wholesale on
/// re-authorization. Eligible for reminders only when a chat id is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Google OAuth credential material
    pub credentials: GoogleCredentials,
    /// Telegram chat to deliver notifications to
    pub chat_id: Option<i64>,
    /// When the user first connected (ISO 8601)
    pub connected_at: String,
}

impl UserRecord {
    /// Whether the scheduler should consider this user at all.
    pub fn reminder_eligible(&self) -> bool {
        self.chat_id.is_some()
    }
}

/// OAuth credential material needed to call the Calendar API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCredentials {
    /// Current access token
    pub token: String,
    /// Refresh token (absent if Google did not re-issue one)
    pub refresh_token: Option<String>,
    /// Token endpoint used for refresh
    pub token_uri: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}
