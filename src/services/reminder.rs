// SPDX-License-Identifier: MIT

//! Reminder scheduler.
//!
//! A one-minute recurring task. Each firing iterates every linked user
//! with a chat destination, fetches their upcoming events, and sends a
//! reminder for every timed event starting 14-16 minutes from now. The
//! inclusive band absorbs the scheduler's own one-minute polling
//! granularity; no de-duplication state is kept across firings, so the
//! delivery guarantee is at-least-once-or-zero, not exactly-once.
//! All-day events have no time component and never remind.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{CalendarEvent, EventStart};
use crate::services::{CalendarService, TelegramClient};
use crate::store::UserStore;

/// How often the scheduler fires.
pub const CYCLE_PERIOD: Duration = Duration::from_secs(60);

/// Reminder band around the nominal 15-minute lead, in minutes.
pub const BAND_MIN_MINUTES: f64 = 14.0;
pub const BAND_MAX_MINUTES: f64 = 16.0;

/// Source of upcoming events for one user. Implemented by
/// [`CalendarService`]; tests substitute a fake.
#[allow(async_fn_in_trait)]
pub trait EventSource: Send + Sync {
    async fn upcoming_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError>;
}

impl EventSource for CalendarService {
    async fn upcoming_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
        self.fetch_upcoming(user_id).await
    }
}

/// Destination for reminder messages. Implemented by [`TelegramClient`];
/// tests substitute a recorder.
#[allow(async_fn_in_trait)]
pub trait ReminderSink: Send + Sync {
    async fn send_reminder(&self, chat_id: i64, text: &str) -> bool;
}

impl ReminderSink for TelegramClient {
    async fn send_reminder(&self, chat_id: i64, text: &str) -> bool {
        self.send_message(chat_id, text).await
    }
}

/// Whether an event start falls inside the reminder band, measured from `now`.
pub fn due_for_reminder(start: &EventStart, now: DateTime<Utc>) -> bool {
    let Some(instant) = start.instant() else {
        return false;
    };

    let minutes_until_start = (instant - now).num_seconds() as f64 / 60.0;
    (BAND_MIN_MINUTES..=BAND_MAX_MINUTES).contains(&minutes_until_start)
}

/// The reminder message for one event.
pub fn reminder_text(event: &CalendarEvent) -> String {
    format!(
        "\u{1F514} <b>Reminder!</b>\n\n\u{1F4C5} {}\n\u{23F0} Starts in 15 minutes",
        event.summary
    )
}

/// One firing of the scheduler across all known users.
///
/// A fetch or send failure for one user is logged and never blocks the
/// remaining users.
pub async fn reminder_tick<S, N>(store: &dyn UserStore, source: &S, sink: &N, now: DateTime<Utc>)
where
    S: EventSource,
    N: ReminderSink,
{
    let users = store.list();
    tracing::debug!(users = users.len(), "Reminder cycle starting");

    for (user_id, record) in users {
        let Some(chat_id) = record.chat_id else {
            continue;
        };

        let events = match source.upcoming_events(&user_id).await {
            Ok(events) => events,
            Err(e) => {
                // Skip this user for this cycle; the next firing retries.
                tracing::warn!(user_id = %user_id, error = %e, "Event fetch failed");
                continue;
            }
        };

        for event in &events {
            if due_for_reminder(&event.start, now) {
                let sent = sink.send_reminder(chat_id, &reminder_text(event)).await;
                if !sent {
                    tracing::warn!(
                        user_id = %user_id,
                        chat_id,
                        event_id = %event.id,
                        "Reminder delivery failed"
                    );
                }
            }
        }
    }
}

/// Run the scheduler until the process exits.
pub async fn run_reminder_loop<S, N>(store: std::sync::Arc<dyn UserStore>, source: S, sink: N)
where
    S: EventSource,
    N: ReminderSink,
{
    let mut interval = tokio::time::interval(CYCLE_PERIOD);
    // The first tick completes immediately; skip it so a fresh deploy
    // does not fire a cycle before the webhook is even registered.
    interval.tick().await;

    loop {
        interval.tick().await;
        reminder_tick(store.as_ref(), &source, &sink, Utc::now()).await;
    }
}
