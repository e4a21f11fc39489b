// SPDX-License-Identifier: MIT

//! Google Calendar API client for fetching upcoming events.
//!
//! Handles:
//! - Listing events in a bounded 7-day window
//! - Access-token refresh against the stored token endpoint
//!
//! "No events" and "fetch failed" are distinct outcomes here; callers
//! decide whether to degrade (the reminder cycle skips the user for one
//! cycle, the events endpoint surfaces a 502).

use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CalendarEvent, EventStart, GoogleCredentials};
use crate::store::{self, UserStore};

/// How far ahead the event window extends.
const LOOKAHEAD_DAYS: i64 = 7;

/// Cap on events fetched per user per request.
const MAX_RESULTS: u32 = 20;

/// Low-level Calendar API client.
#[derive(Clone)]
pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(super::telegram::HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }

    /// List events from the primary calendar in `[now, now + 7 days)`,
    /// ordered by start time, recurring events expanded to single
    /// instances, capped at 20 results.
    pub async fn list_upcoming(&self, access_token: &str) -> Result<Vec<CalendarEvent>, AppError> {
        let now = Utc::now();
        let time_min = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max =
            (now + Duration::days(LOOKAHEAD_DAYS)).to_rfc3339_opts(SecondsFormat::Secs, true);

        let url = format!("{}/calendars/primary/events", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("maxResults", &MAX_RESULTS.to_string()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::GoogleApi(AppError::GOOGLE_TOKEN_ERROR.to_string()));
            }

            return Err(AppError::GoogleApi(format!("HTTP {}: {}", status, body)));
        }

        let list: EventsListResponse = response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("JSON parse error: {}", e)))?;

        Ok(list.items.into_iter().filter_map(ApiEvent::into_model).collect())
    }

    /// Refresh an expired access token at the credential's token endpoint.
    pub async fn refresh_access_token(
        &self,
        credentials: &GoogleCredentials,
    ) -> Result<String, AppError> {
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or_else(|| AppError::GoogleApi("No refresh token available".to_string()))?;

        let response = self
            .http
            .post(&credentials.token_uri)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleApi(format!(
                "Token refresh failed with HTTP {}: {}",
                status, body
            )));
        }

        let refreshed: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("JSON parse error: {}", e)))?;

        Ok(refreshed.access_token)
    }
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level calendar service that manages the token lifecycle.
///
/// On a token error the service refreshes the access token, writes the
/// rotated token back to the store, and retries the fetch once.
#[derive(Clone)]
pub struct CalendarService {
    client: CalendarClient,
    store: Arc<dyn UserStore>,
}

impl CalendarService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            client: CalendarClient::new(),
            store,
        }
    }

    /// Fetch upcoming events for a linked user.
    ///
    /// Returns `Unauthorized` if the user is not in the store.
    pub async fn fetch_upcoming(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
        let record = self.store.get(user_id).ok_or(AppError::Unauthorized)?;

        match self.client.list_upcoming(&record.credentials.token).await {
            Ok(events) => Ok(events),
            Err(e) if e.is_google_token_error() => {
                tracing::info!(user_id, "Access token expired, refreshing");

                let new_token = self.client.refresh_access_token(&record.credentials).await?;
                store::update_access_token(self.store.as_ref(), user_id, &new_token);

                self.client.list_upcoming(&new_token).await
            }
            Err(e) => Err(e),
        }
    }
}

/// Token refresh response from Google.
#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
}

/// Events list response wire format.
#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// Single event wire format.
#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    summary: Option<String>,
    #[serde(default)]
    start: ApiEventTime,
    location: Option<String>,
    description: Option<String>,
}

/// Event start as Google reports it: `dateTime` for timed events,
/// `date` for all-day events.
#[derive(Debug, Default, Deserialize)]
struct ApiEventTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

impl ApiEvent {
    /// Convert to the domain model; events with no usable start are dropped.
    fn into_model(self) -> Option<CalendarEvent> {
        let start = match (self.start.date_time, self.start.date) {
            (Some(dt), _) => EventStart::DateTime(dt),
            (None, Some(d)) => EventStart::AllDay(d),
            (None, None) => return None,
        };

        Some(CalendarEvent {
            id: self.id,
            summary: self.summary.unwrap_or_else(|| "Untitled".to_string()),
            start,
            location: self.location.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}
