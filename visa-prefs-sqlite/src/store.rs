use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;
use visa_core::{PreferenceError, PreferenceStore};

/// Location value that selects an ephemeral in-memory database.
pub(crate) const IN_MEMORY: &str = ":memory:";

pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    /// Opens an in-memory database on a single long-lived connection, so
    /// the data outlives individual queries.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to create in-memory database")?;
        Ok(Self { pool })
    }

    /// Opens the store at `location`: a file path (created if missing) or
    /// `:memory:`.
    pub async fn open(location: &str) -> Result<Self> {
        if location.trim() == IN_MEMORY {
            Self::in_memory().await
        } else {
            Self::new(&connection_url(location)).await
        }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether `location` already holds a database. `:memory:` always does;
/// `sqlite:` URLs are left for sqlx to judge.
pub(crate) fn location_exists(location: &str) -> bool {
    let location = location.trim();
    location == IN_MEMORY || location.starts_with("sqlite:") || Path::new(location).is_file()
}

/// Maps a bare file path to a sqlx URL that creates the file when missing.
/// Values that already carry the `sqlite:` scheme pass through untouched.
pub(crate) fn connection_url(location: &str) -> String {
    let location = location.trim();
    if location.starts_with("sqlite:") {
        location.to_string()
    } else {
        format!("sqlite:{location}?mode=rwc")
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;

        row.map(|row| {
            row.try_get("value")
                .map_err(|e| PreferenceError::Storage(format!("Failed to get value: {}", e)))
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        sqlx::query(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| PreferenceError::Storage(e.to_string()))?;

        debug!(key, value, "preference stored");
        Ok(())
    }
}
