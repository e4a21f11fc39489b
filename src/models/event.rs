//! Calendar event model.
//!
//! Events are transient: produced fresh on every fetch, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One upcoming calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventStart,
    pub location: String,
    pub description: String,
}

/// Event start as Google reports it: a timed RFC 3339 instant or an
/// all-day `YYYY-MM-DD` date. Raw strings are kept so display preserves
/// the event's own local offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventStart {
    DateTime(String),
    AllDay(String),
}

impl EventStart {
    /// The raw start string as received from the API.
    pub fn raw(&self) -> &str {
        match self {
            EventStart::DateTime(s) | EventStart::AllDay(s) => s,
        }
    }

    /// The start instant in UTC. All-day events have no time component
    /// and return `None`, as does an unparseable date-time.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventStart::DateTime(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            EventStart::AllDay(_) => None,
        }
    }

    /// Human-readable start, truncated to minute precision for timed
    /// events (`2026-08-29 15:00`) and left as-is for all-day dates.
    pub fn display(&self) -> String {
        match self {
            EventStart::DateTime(s) => {
                let truncated: String = s.chars().take(16).collect();
                truncated.replace('T', " ")
            }
            EventStart::AllDay(s) => s.clone(),
        }
    }
}
