// SPDX-License-Identifier: MIT

//! Event query API.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::CalendarEvent;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/events/{user_id}", get(get_user_events))
}

/// Event list response.
#[derive(Serialize)]
pub struct EventsResponse {
    pub status: String,
    pub events: Vec<EventResponse>,
}

/// One event, with the start rendered as Google reported it.
#[derive(Serialize)]
pub struct EventResponse {
    pub id: String,
    pub summary: String,
    pub start: String,
    pub location: String,
    pub description: String,
}

impl From<CalendarEvent> for EventResponse {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            summary: event.summary,
            start: event.start.raw().to_string(),
            location: event.location,
            description: event.description,
        }
    }
}

/// Get a linked user's upcoming events.
///
/// 401 if the user never authorized; 502 if the upstream fetch fails.
async fn get_user_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<EventsResponse>> {
    if state.store.get(&user_id).is_none() {
        return Err(AppError::Unauthorized);
    }

    let events = state.calendar.fetch_upcoming(&user_id).await?;

    Ok(Json(EventsResponse {
        status: "ok".to_string(),
        events: events.into_iter().map(EventResponse::from).collect(),
    }))
}
