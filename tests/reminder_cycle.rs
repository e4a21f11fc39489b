// SPDX-License-Identifier: MIT

//! Reminder cycle tests with fake event sources and sinks.

use calbridge::error::AppError;
use calbridge::models::{CalendarEvent, EventStart};
use calbridge::services::reminder::{reminder_tick, EventSource, ReminderSink};
use calbridge::store::{MemoryStore, UserStore};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

mod common;

/// Canned per-user events; records which users were fetched.
#[derive(Default)]
struct FakeSource {
    events: HashMap<String, Vec<CalendarEvent>>,
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl EventSource for FakeSource {
    async fn upcoming_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>, AppError> {
        self.fetched.lock().unwrap().push(user_id.to_string());

        if self.failing.contains(user_id) {
            return Err(AppError::GoogleApi("simulated outage".to_string()));
        }
        Ok(self.events.get(user_id).cloned().unwrap_or_default())
    }
}

/// Records every delivered reminder.
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(i64, String)>>,
}

impl ReminderSink for RecordingSink {
    async fn send_reminder(&self, chat_id: i64, text: &str) -> bool {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        true
    }
}

fn timed_event(id: &str, summary: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: summary.to_string(),
        start: EventStart::DateTime(start.to_rfc3339()),
        location: String::new(),
        description: String::new(),
    }
}

fn all_day_event(id: &str, summary: &str, date: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: summary.to_string(),
        start: EventStart::AllDay(date.to_string()),
        location: String::new(),
        description: String::new(),
    }
}

#[tokio::test]
async fn test_event_in_band_sends_one_reminder() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(Some(100)));

    let source = FakeSource {
        events: HashMap::from([(
            "A".to_string(),
            vec![timed_event("evt1", "Team sync", now + Duration::minutes(15))],
        )]),
        ..Default::default()
    };
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 100);
    assert!(sent[0].1.contains("Team sync"));
}

#[tokio::test]
async fn test_event_outside_band_sends_nothing() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(Some(100)));

    let source = FakeSource {
        events: HashMap::from([(
            "A".to_string(),
            vec![
                timed_event("evt1", "Too soon", now + Duration::minutes(5)),
                timed_event("evt2", "Too late", now + Duration::minutes(30)),
                timed_event("evt3", "Already started", now - Duration::minutes(15)),
            ],
        )]),
        ..Default::default()
    };
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    assert!(sink.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_all_day_event_never_reminds() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(Some(100)));

    let source = FakeSource {
        events: HashMap::from([(
            "A".to_string(),
            vec![all_day_event("evt1", "Company offsite", "2026-08-29")],
        )]),
        ..Default::default()
    };
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    assert!(sink.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_multiple_events_in_band_each_remind() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(Some(100)));

    let source = FakeSource {
        events: HashMap::from([(
            "A".to_string(),
            vec![
                timed_event("evt1", "First", now + Duration::minutes(14)),
                timed_event("evt2", "Second", now + Duration::minutes(16)),
            ],
        )]),
        ..Default::default()
    };
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    assert_eq!(sink.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_one_user_failure_does_not_block_others() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(Some(100)));
    store.put("B", common::test_record(Some(200)));

    let source = FakeSource {
        events: HashMap::from([(
            "B".to_string(),
            vec![timed_event("evt1", "Planning", now + Duration::minutes(15))],
        )]),
        failing: HashSet::from(["A".to_string()]),
        ..Default::default()
    };
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 200);
}

#[tokio::test]
async fn test_user_without_chat_id_is_not_fetched() {
    let now = Utc::now();
    let store = MemoryStore::new();
    store.put("A", common::test_record(None));

    let source = FakeSource::default();
    let sink = RecordingSink::default();

    reminder_tick(&store, &source, &sink, now).await;

    assert!(source.fetched.lock().unwrap().is_empty());
    assert!(sink.sent.lock().unwrap().is_empty());
}
