// SPDX-License-Identifier: MIT

//! Calbridge API Server
//!
//! Links Telegram users to Google Calendar via OAuth and delivers
//! reminders shortly before events start.

use calbridge::{
    config::Config,
    services::{reminder, CalendarService, TelegramClient},
    store::MemoryStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Calbridge API");

    // In-memory credential store; all links are lost on restart.
    let store: Arc<dyn calbridge::store::UserStore> = Arc::new(MemoryStore::new());

    let telegram = TelegramClient::new(config.telegram_bot_token.clone());
    let calendar = CalendarService::new(store.clone());

    // Reminder scheduler runs for the lifetime of the process.
    tokio::spawn(reminder::run_reminder_loop(
        store.clone(),
        calendar.clone(),
        telegram.clone(),
    ));
    tracing::info!("Reminder scheduler started");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        calendar,
        telegram,
    });

    // Build router
    let app = calbridge::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("calbridge=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
