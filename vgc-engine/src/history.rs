//! Playlist history
//!
//! Most-recent-first record of playlists the operator has touched, capped
//! at ten entries, unique by playlist id. Stored as one JSON blob in the
//! key-value table; storage failures degrade to in-memory with a warning,
//! like the model store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::store::{read_key, write_key};

const HISTORY_KEY: &str = "playlist_history";
const HISTORY_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    /// RFC 3339 timestamp of the last use
    pub last_used: String,
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Most-recent-first history; empty on any load failure.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        match read_key(&self.pool, HISTORY_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Playlist history is corrupt, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Playlist history load failed");
                Vec::new()
            }
        }
    }

    /// Record a playlist use: moves it to the front, dropping any previous
    /// entry with the same id, and truncates to the cap.
    pub async fn record(&self, id: &str, title: &str) {
        let mut entries = self.list().await;
        entries.retain(|entry| entry.id != id);
        entries.insert(
            0,
            HistoryEntry {
                id: id.to_string(),
                title: title.to_string(),
                last_used: Utc::now().to_rfc3339(),
            },
        );
        entries.truncate(HISTORY_CAP);

        match serde_json::to_string(&entries) {
            Ok(json) => {
                if let Err(e) = write_key(&self.pool, HISTORY_KEY, &json).await {
                    tracing::warn!(error = %e, "Playlist history save failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Playlist history serialization failed"),
        }
    }
}
