// SPDX-License-Identifier: MIT

//! Calbridge: Telegram reminders for Google Calendar events
//!
//! This crate provides the backend service that links Telegram users to
//! their Google Calendar via OAuth and delivers reminders shortly before
//! events start.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::Config;
use services::{CalendarService, TelegramClient};
use store::UserStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    pub calendar: CalendarService,
    pub telegram: TelegramClient,
}
