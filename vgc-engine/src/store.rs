//! Model persistence
//!
//! A namespaced key-value table in SQLite backs the learned models, the
//! playlist history, and provider settings. One row per namespace key
//! (`model:<domain>`, `playlist_history`, `youtube_api_key`), JSON values,
//! UPSERT writes.
//!
//! Persistence failures here never crash the process: loads fall back to
//! defaults and saves degrade to in-memory state, each with a surfaced
//! warning. The operation that triggered the save still succeeds.

use crate::model::SearchModel;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use vgc_common::{Domain, Result};

/// Open (or create) the database and ensure the schema exists.
pub async fn init_database_pool(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database for tests.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Read one namespaced value, None when absent.
pub async fn read_key(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// Write one namespaced value (UPSERT).
pub async fn write_key(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Provider API key accessors.
pub async fn get_api_key(pool: &SqlitePool) -> Result<Option<String>> {
    read_key(pool, "youtube_api_key").await
}

pub async fn set_api_key(pool: &SqlitePool, key: &str) -> Result<()> {
    write_key(pool, "youtube_api_key", key).await
}

/// Loads and saves per-domain learned models.
#[derive(Clone)]
pub struct ModelStore {
    pool: SqlitePool,
}

impl ModelStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn model_key(domain: Domain) -> String {
        format!("model:{}", domain)
    }

    /// Load the model for a domain. Absent, unreadable, or corrupt rows
    /// all produce a default model; the two failure cases warn.
    pub async fn load(&self, domain: Domain) -> SearchModel {
        match read_key(&self.pool, &Self::model_key(domain)).await {
            Ok(Some(json)) => match serde_json::from_str::<SearchModel>(&json) {
                Ok(model) => {
                    tracing::debug!(%domain, "Loaded learned model");
                    model
                }
                Err(e) => {
                    tracing::warn!(%domain, error = %e, "Stored model is corrupt, using defaults");
                    SearchModel::new(domain)
                }
            },
            Ok(None) => SearchModel::new(domain),
            Err(e) => {
                tracing::warn!(%domain, error = %e, "Model load failed, using defaults");
                SearchModel::new(domain)
            }
        }
    }

    /// Persist a model. On failure the model keeps living in memory and a
    /// warning is surfaced; callers are not failed.
    pub async fn save(&self, model: &SearchModel) {
        let json = match serde_json::to_string(model) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(domain = %model.domain, error = %e, "Model serialization failed");
                return;
            }
        };
        if let Err(e) = write_key(&self.pool, &Self::model_key(model.domain), &json).await {
            tracing::warn!(
                domain = %model.domain,
                error = %e,
                "Model save failed, continuing with in-memory state"
            );
        } else {
            tracing::debug!(domain = %model.domain, "Saved learned model");
        }
    }
}
