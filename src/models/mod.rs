// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod event;
pub mod user;

pub use event::{CalendarEvent, EventStart};
pub use user::{GoogleCredentials, UserRecord};
