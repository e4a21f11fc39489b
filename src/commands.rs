// SPDX-License-Identifier: MIT

//! Chat command vocabulary and replies.
//!
//! Commands are stateless per-message: each one is interpreted against
//! the current store contents only, with no conversation state.

use crate::services::EventSource;
use crate::store::UserStore;

/// Maximum events shown by `/events`.
const EVENTS_LIMIT: usize = 5;

pub const NOT_CONNECTED_TEXT: &str =
    "\u{274C} Google Calendar is not connected. Use /start to connect";

pub const CONNECTED_TEXT: &str = "\u{2705} Google Calendar connected";

pub const NO_EVENTS_TEXT: &str = "\u{1F4ED} No upcoming events in the next 7 days";

pub const FETCH_FAILED_TEXT: &str =
    "\u{26A0} Couldn't fetch your events right now, please try again later";

pub const HELP_TEXT: &str = "\u{1F4D6} <b>Available commands:</b>\n\n\
/start - Connect Google Calendar\n\
/events - Show upcoming events\n\
/status - Check connection status\n\
/help - Show this help\n\n\
\u{1F514} The bot automatically sends a reminder 15 minutes before each event starts.";

/// The recognized command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Events,
    Status,
    Help,
}

impl Command {
    /// Parse a message text. Anything but an exact command is `None`
    /// and produces no reply at all.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/start" => Some(Command::Start),
            "/events" => Some(Command::Events),
            "/status" => Some(Command::Status),
            "/help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Build the reply for one command.
///
/// `/events` only reaches out to the calendar when the user is actually
/// in the store; everything else is answered from local state.
pub async fn respond<S: EventSource>(
    command: Command,
    user_id: &str,
    chat_id: i64,
    store: &dyn UserStore,
    source: &S,
    base_url: &str,
) -> String {
    match command {
        Command::Start => {
            let auth_url = format!(
                "{}/auth/google?user_id={}&chat_id={}",
                base_url, user_id, chat_id
            );
            format!(
                "\u{1F44B} Hi!\n\nI remind you about Google Calendar events.\n\n\
                 \u{1F517} <a href=\"{}\">Click here to connect Google Calendar</a>",
                auth_url
            )
        }

        Command::Events => {
            if store.get(user_id).is_none() {
                return NOT_CONNECTED_TEXT.to_string();
            }

            match source.upcoming_events(user_id).await {
                Ok(events) if events.is_empty() => NO_EVENTS_TEXT.to_string(),
                Ok(events) => {
                    let mut reply = String::from("\u{1F4C5} <b>Your events:</b>\n\n");
                    for event in events.iter().take(EVENTS_LIMIT) {
                        reply.push_str(&format!(
                            "\u{2022} {}\n  \u{23F0} {}\n\n",
                            event.summary,
                            event.start.display()
                        ));
                    }
                    reply
                }
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Event fetch failed for /events");
                    FETCH_FAILED_TEXT.to_string()
                }
            }
        }

        Command::Status => {
            if store.get(user_id).is_some() {
                CONNECTED_TEXT.to_string()
            } else {
                NOT_CONNECTED_TEXT.to_string()
            }
        }

        Command::Help => HELP_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::CalendarEvent;
    use crate::store::MemoryStore;

    /// Fails the test if the calendar is consulted at all.
    struct PanickingSource;

    impl EventSource for PanickingSource {
        async fn upcoming_events(&self, _user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
            panic!("calendar must not be called");
        }
    }

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/events"), Some(Command::Events));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("  /help  "), Some(Command::Help));
    }

    #[test]
    fn test_parse_unknown_text() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/start now"), None);
    }

    #[tokio::test]
    async fn test_events_unauthorized_skips_calendar() {
        let store = MemoryStore::new();

        let reply = respond(
            Command::Events,
            "42",
            100,
            &store,
            &PanickingSource,
            "http://localhost:8080",
        )
        .await;

        assert_eq!(reply, NOT_CONNECTED_TEXT);
    }

    #[tokio::test]
    async fn test_status_unauthorized() {
        let store = MemoryStore::new();

        let reply = respond(
            Command::Status,
            "42",
            100,
            &store,
            &PanickingSource,
            "http://localhost:8080",
        )
        .await;

        assert_eq!(reply, NOT_CONNECTED_TEXT);
    }

    #[tokio::test]
    async fn test_start_includes_auth_link() {
        let store = MemoryStore::new();

        let reply = respond(
            Command::Start,
            "42",
            100,
            &store,
            &PanickingSource,
            "http://localhost:8080",
        )
        .await;

        assert!(reply.contains("http://localhost:8080/auth/google?user_id=42&chat_id=100"));
    }

    #[tokio::test]
    async fn test_help_is_constant() {
        let store = MemoryStore::new();

        let reply = respond(
            Command::Help,
            "42",
            100,
            &store,
            &PanickingSource,
            "http://localhost:8080",
        )
        .await;

        assert_eq!(reply, HELP_TEXT);
    }
}
