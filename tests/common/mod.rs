// SPDX-License-Identifier: MIT

use calbridge::config::Config;
use calbridge::models::{GoogleCredentials, UserRecord};
use calbridge::services::{CalendarService, TelegramClient};
use calbridge::store::{MemoryStore, UserStore};
use calbridge::AppState;
use std::sync::Arc;

/// Create a test app with offline dependencies.
///
/// The bot token is left unset so any reply attempt short-circuits to a
/// logged failure instead of reaching the network.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.telegram_bot_token = None;

    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    let telegram = TelegramClient::new(None);
    let calendar = CalendarService::new(store.clone());

    let state = Arc::new(AppState {
        config,
        store,
        calendar,
        telegram,
    });

    (calbridge::routes::create_router(state.clone()), state)
}

/// A linked user record for seeding the store.
#[allow(dead_code)]
pub fn test_record(chat_id: Option<i64>) -> UserRecord {
    UserRecord {
        credentials: GoogleCredentials {
            token: "test_access_token".to_string(),
            refresh_token: Some("test_refresh_token".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
        },
        chat_id,
        connected_at: "2026-01-01T00:00:00Z".to_string(),
    }
}
