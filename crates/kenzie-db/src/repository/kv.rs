//! # Key-Value Repository
//!
//! SQLite implementation of [`KeyValueStore`] over the `kv_store` table.
//!
//! ## Write Path
//! ```text
//! set("KenzieCart", json)
//!      │
//!      ▼
//! INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
//! ON CONFLICT(key) DO UPDATE SET value = excluded.value, ...
//!      │
//!      ▼
//! one row per key, overwritten in a single statement
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }
}

#[async_trait]
impl KeyValueStore for KvRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Removed key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> KvRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.kv()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let repo = repo().await;
        assert_eq!(repo.get("KenzieCart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let repo = repo().await;
        repo.set("KenzieCart", "{\"a\":1}").await.unwrap();
        repo.set("KenzieCart", "{\"a\":2}").await.unwrap();

        assert_eq!(
            repo.get("KenzieCart").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let repo = repo().await;
        repo.set("k", "v").await.unwrap();
        repo.remove("k").await.unwrap();
        repo.remove("k").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), None);
    }
}
