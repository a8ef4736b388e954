use super::traits::{KvStore, StorageFuture, StorageResult};
use crate::error::StorageError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

const KV_SCHEMA_META_TABLE: &str = "
CREATE TABLE IF NOT EXISTS kv_schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";
const KV_SCHEMA_VERSION_KEY: &str = "kv_schema_version";
const KV_SCHEMA_VERSION: u32 = 1;

async fn ensure_kv_schema_version(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::query(KV_SCHEMA_META_TABLE).execute(pool).await?;

    let stored_version: Option<(String,)> =
        sqlx::query_as("SELECT value FROM kv_schema_meta WHERE key = $1")
            .bind(KV_SCHEMA_VERSION_KEY)
            .fetch_optional(pool)
            .await?;

    if let Some((value,)) = stored_version {
        let parsed = value.parse::<u32>().map_err(|_| {
            StorageError::Migration(format!("invalid kv schema version value: {value}"))
        })?;
        if parsed != KV_SCHEMA_VERSION {
            return Err(StorageError::Migration(format!(
                "incompatible kv schema version: stored={parsed}, expected={KV_SCHEMA_VERSION}"
            )));
        }
        return Ok(());
    }

    sqlx::query("INSERT INTO kv_schema_meta (key, value) VALUES ($1, $2)")
        .bind(KV_SCHEMA_VERSION_KEY)
        .bind(KV_SCHEMA_VERSION.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// SQLite-backed key-value store using a sqlx async pool.
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Create a new store with an existing pool and run migrations.
    pub async fn new(pool: SqlitePool) -> StorageResult<Self> {
        ensure_kv_schema_version(&pool).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_documents (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_counters (
                 key TEXT PRIMARY KEY,
                 value INTEGER NOT NULL DEFAULT 0,
                 updated_at TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Open (creating if needed) a database file.
    pub async fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                StorageError::Backend(format!(
                    "failed creating database directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::new(pool).await
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl KvStore for SqliteKvStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT value FROM kv_documents WHERE key = $1")
                    .bind(key)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row.map(|(value,)| value))
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let timestamp = Utc::now().to_rfc3339();
            sqlx::query(
                "INSERT INTO kv_documents (key, value, updated_at)
                 VALUES ($1, $2, $3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(&timestamp)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;
            let documents = sqlx::query("DELETE FROM kv_documents WHERE key = $1")
                .bind(key)
                .execute(&mut *tx)
                .await?;
            let counters = sqlx::query("DELETE FROM kv_counters WHERE key = $1")
                .bind(key)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok(documents.rows_affected() + counters.rows_affected() > 0)
        })
    }

    fn increment<'a>(&'a self, key: &'a str, delta: i64) -> StorageFuture<'a, i64> {
        Box::pin(async move {
            let timestamp = Utc::now().to_rfc3339();
            let (value,): (i64,) = sqlx::query_as(
                "INSERT INTO kv_counters (key, value, updated_at)
                 VALUES ($1, $2, $3)
                 ON CONFLICT(key) DO UPDATE SET value = value + excluded.value, updated_at = excluded.updated_at
                 RETURNING value",
            )
            .bind(key)
            .bind(delta)
            .bind(&timestamp)
            .fetch_one(&self.pool)
            .await?;
            Ok(value)
        })
    }

    fn get_counter<'a>(&'a self, key: &'a str) -> StorageFuture<'a, i64> {
        Box::pin(async move {
            let row: Option<(i64,)> = sqlx::query_as("SELECT value FROM kv_counters WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.map_or(0, |(value,)| value))
        })
    }
}
