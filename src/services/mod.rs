// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod google;
pub mod oauth;
pub mod reminder;
pub mod telegram;

pub use google::{CalendarClient, CalendarService};
pub use oauth::{AuthSession, OAuthFlow};
pub use reminder::{EventSource, ReminderSink};
pub use telegram::TelegramClient;
