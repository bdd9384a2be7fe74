//! SQLite document backend
//!
//! One table, `records(key, message)`, where `message` holds the JSON text of
//! the record. Uniqueness is enforced by the primary key, so `insert` and
//! `update` are single atomic statements.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::durable::DocumentBackend;
use crate::error::Result;

pub struct SqliteDocuments {
    pool: SqlitePool,
}

impl SqliteDocuments {
    /// Opens (creating if missing) the database at `url` and ensures the
    /// `records` table exists.
    ///
    /// In-memory databases are private to a connection, so the pool is
    /// pinned to a single long-lived connection for them.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        Self::run_migrations(&pool).await?;

        info!("SQLite document store ready at {}", url);
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY NOT NULL,
                message TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for SqliteDocuments {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM records WHERE key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find(&self, key: &str) -> Result<Option<String>> {
        let message = sqlx::query_scalar::<_, String>("SELECT message FROM records WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(message)
    }

    async fn insert(&self, key: &str, document: String) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO records (key, message) VALUES (?, ?) ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, key: &str, document: String) -> Result<bool> {
        let result = sqlx::query("UPDATE records SET message = ? WHERE key = ?")
            .bind(document)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM records WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
