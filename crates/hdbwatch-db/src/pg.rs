//! [`DocumentStore`] over a single Postgres `documents` table.

use serde_json::Value;
use sqlx::PgPool;

use crate::store::{DocumentStore, UpsertOutcome};
use crate::{connect_pool, run_migrations, Collection, DbError, PoolConfig};

/// Postgres-backed document store. Construct once at process start with
/// [`PgDocumentStore::connect`] and release with [`PgDocumentStore::close`].
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the connection cannot be established.
    pub async fn connect(
        database_url: &str,
        db_name: &str,
        config: PoolConfig,
    ) -> Result<Self, DbError> {
        let pool = connect_pool(database_url, db_name, config).await?;
        tracing::debug!(db_name, "connected to document store");
        Ok(Self::new(pool))
    }

    /// Apply pending migrations; returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if a migration fails.
    pub async fn migrate(&self) -> Result<usize, DbError> {
        Ok(run_migrations(&self.pool).await?)
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl DocumentStore for PgDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> Result<Option<Value>, DbError> {
        let body = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             ORDER BY created_at, doc_key \
             LIMIT 1",
        )
        .bind(collection.as_str())
        .bind(filter)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn find(&self, collection: Collection, filter: &Value) -> Result<Vec<Value>, DbError> {
        let bodies = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents \
             WHERE collection = $1 AND body @> $2 \
             ORDER BY created_at, doc_key",
        )
        .bind(collection.as_str())
        .bind(filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(bodies)
    }

    async fn insert(&self, collection: Collection, key: &str, doc: &Value) -> Result<bool, DbError> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, doc_key, body) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (collection, doc_key) DO NOTHING",
        )
        .bind(collection.as_str())
        .bind(key)
        .bind(doc)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn upsert(
        &self,
        collection: Collection,
        key: &str,
        doc: &Value,
    ) -> Result<UpsertOutcome, DbError> {
        // xmax is 0 only for a freshly inserted tuple.
        let inserted: bool = sqlx::query_scalar(
            "INSERT INTO documents (collection, doc_key, body) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (collection, doc_key) DO UPDATE \
                 SET body = documents.body || EXCLUDED.body, \
                     updated_at = now() \
             RETURNING (xmax = 0) AS inserted",
        )
        .bind(collection.as_str())
        .bind(key)
        .bind(doc)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn update_many(
        &self,
        collection: Collection,
        filter: &Value,
        patch: &Value,
        unset: &[&str],
    ) -> Result<u64, DbError> {
        let unset: Vec<String> = unset.iter().map(|k| (*k).to_string()).collect();
        let result = sqlx::query(
            "UPDATE documents \
             SET body = (body || $3) - $4::text[], updated_at = now() \
             WHERE collection = $1 AND body @> $2",
        )
        .bind(collection.as_str())
        .bind(filter)
        .bind(patch)
        .bind(unset)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection, filter: &Value) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND body @> $2",
        )
        .bind(collection.as_str())
        .bind(filter)
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete_many(&self, collection: Collection, filter: &Value) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND body @> $2")
            .bind(collection.as_str())
            .bind(filter)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
