// SPDX-License-Identifier: MIT

//! Credential store.
//!
//! Keyed by Telegram user id. The trait seam lets routes, the scheduler,
//! and tests share one injected handle; the only shipped implementation
//! is in-memory, so all records are lost on restart.

use dashmap::DashMap;

use crate::models::{GoogleCredentials, UserRecord};

/// Keyed store of linked users.
pub trait UserStore: Send + Sync {
    /// Insert or replace the record for `user_id` wholesale.
    fn put(&self, user_id: &str, record: UserRecord);

    /// Look up a user by Telegram user id.
    fn get(&self, user_id: &str) -> Option<UserRecord>;

    /// Snapshot of all records, for the reminder cycle.
    fn list(&self) -> Vec<(String, UserRecord)>;

    /// Number of linked users.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Update only the access token on an existing record, after a refresh.
/// Read-patch-write; last write wins, same as re-authorization.
pub fn update_access_token(store: &dyn UserStore, user_id: &str, token: &str) {
    if let Some(mut record) = store.get(user_id) {
        record.credentials.token = token.to_string();
        store.put(user_id, record);
    }
}

/// Convenience used by the OAuth callback.
pub fn put_credentials(
    store: &dyn UserStore,
    user_id: &str,
    credentials: GoogleCredentials,
    chat_id: Option<i64>,
) {
    store.put(
        user_id,
        UserRecord {
            credentials,
            chat_id,
            connected_at: chrono::Utc::now().to_rfc3339(),
        },
    );
}

/// In-memory store backed by a concurrent map.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn put(&self, user_id: &str, record: UserRecord) {
        self.users.insert(user_id.to_string(), record);
    }

    fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.users.get(user_id).map(|r| r.value().clone())
    }

    fn list(&self) -> Vec<(String, UserRecord)> {
        self.users
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(chat_id: Option<i64>) -> UserRecord {
        UserRecord {
            credentials: GoogleCredentials {
                token: "access".to_string(),
                refresh_token: Some("refresh".to_string()),
                token_uri: "https://oauth2.googleapis.com/token".to_string(),
                client_id: "cid".to_string(),
                client_secret: "secret".to_string(),
            },
            chat_id,
            connected_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("42", test_record(Some(100)));
        store.put("42", test_record(Some(200)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("42").unwrap().chat_id, Some(200));
    }

    #[test]
    fn test_get_absent() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_access_token_preserves_rest() {
        let store = MemoryStore::new();
        store.put("42", test_record(Some(100)));

        update_access_token(&store, "42", "rotated");

        let record = store.get("42").unwrap();
        assert_eq!(record.credentials.token, "rotated");
        assert_eq!(record.credentials.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(record.chat_id, Some(100));
    }

    #[test]
    fn test_update_access_token_absent_user_is_noop() {
        let store = MemoryStore::new();
        update_access_token(&store, "missing", "rotated");
        assert!(store.is_empty());
    }
}
