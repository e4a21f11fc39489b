// SPDX-License-Identifier: MIT

//! Google OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::oauth::{self, AuthSession, OAuthFlow};
use crate::store;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
}

/// Query parameters for starting the OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    chat_id: Option<i64>,
}

/// Start OAuth flow - redirect to Google authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
) -> Result<Redirect> {
    let user_id = params
        .user_id
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;

    let flow = OAuthFlow::from_config(&state.config)?;

    let session = AuthSession {
        telegram_user_id: user_id.clone(),
        chat_id: params.chat_id,
    };
    let oauth_state = oauth::sign_state(&session, &state.config.session_signing_key)?;
    let auth_url = flow.authorization_url(&oauth_state);

    tracing::info!(
        user_id = %user_id,
        chat_id = ?params.chat_id,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - verify state, exchange code, store credentials.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<&'static str>> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return Err(AppError::OAuth(error));
    }

    let oauth_state = params
        .state
        .ok_or_else(|| AppError::OAuth("missing state parameter".to_string()))?;

    let session = oauth::verify_state(&oauth_state, &state.config.session_signing_key)
        .ok_or_else(|| AppError::OAuth("invalid or tampered state parameter".to_string()))?;

    let code = params
        .code
        .ok_or_else(|| AppError::OAuth("missing authorization code".to_string()))?;

    let flow = OAuthFlow::from_config(&state.config)?;
    let credentials = flow.exchange_code(&code).await?;

    store::put_credentials(
        state.store.as_ref(),
        &session.telegram_user_id,
        credentials,
        session.chat_id,
    );

    tracing::info!(
        user_id = %session.telegram_user_id,
        "User authorized, credentials stored"
    );

    // One-time confirmation; a failed send is logged by the client and
    // does not fail the authorization.
    if let Some(chat_id) = session.chat_id {
        state
            .telegram
            .send_message(
                chat_id,
                "\u{2705} <b>Google Calendar connected!</b>\n\n\
                 You will now get a reminder 15 minutes before each event starts.",
            )
            .await;
    }

    Ok(Html(SUCCESS_PAGE))
}

const SUCCESS_PAGE: &str = r#"<html>
<head><title>Success!</title></head>
<body style="font-family: Arial; text-align: center; padding-top: 50px;">
    <h1>&#9989; Authorization successful!</h1>
    <p>Google Calendar is connected to the bot.</p>
    <p>You can close this window and return to Telegram.</p>
</body>
</html>"#;
