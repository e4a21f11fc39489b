// SPDX-License-Identifier: MIT

//! Telegram webhook routes: inbound updates plus webhook registration.

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::commands::Command;
use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", post(handle_update))
        .route("/set_webhook", get(set_webhook))
        .route("/delete_webhook", get(delete_webhook))
}

/// Inbound Telegram update. Only the message fields we dispatch on.
#[derive(Debug, Deserialize)]
struct Update {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    from: Sender,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Sender {
    id: i64,
}

/// Handle an inbound Telegram update (POST).
///
/// Always replies `{"ok": true}`: Telegram retries non-2xx deliveries,
/// and a malformed or unrecognized update is not worth a retry.
async fn handle_update(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let update: Update = match serde_json::from_value(payload) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse Telegram update");
            return Json(serde_json::json!({"ok": true}));
        }
    };

    let Some(message) = update.message else {
        return Json(serde_json::json!({"ok": true}));
    };

    let chat_id = message.chat.id;
    let user_id = message.from.id.to_string();
    let text = message.text.unwrap_or_default();

    // Unrecognized text gets no reply at all.
    if let Some(command) = Command::parse(&text) {
        tracing::info!(user_id = %user_id, chat_id, command = ?command, "Command received");

        let reply = crate::commands::respond(
            command,
            &user_id,
            chat_id,
            state.store.as_ref(),
            &state.calendar,
            &state.config.base_url,
        )
        .await;

        state.telegram.send_message(chat_id, &reply).await;
    }

    Json(serde_json::json!({"ok": true}))
}

/// Register the webhook URL with Telegram (GET).
async fn set_webhook(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let webhook_url = format!("{}/webhook", state.config.base_url);
    let response = state.telegram.set_webhook(&webhook_url).await?;

    tracing::info!(url = %webhook_url, "Webhook registered");
    Ok(Json(response))
}

/// Remove the registered webhook (GET).
async fn delete_webhook(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let response = state.telegram.delete_webhook().await?;

    tracing::info!("Webhook removed");
    Ok(Json(response))
}
