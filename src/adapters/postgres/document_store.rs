//! PostgreSQL implementation of the Persistence port.
//!
//! All collections share one `documents` table keyed by
//! `(collection, key)` with a JSONB body. Equality filters become a JSONB
//! containment test, which the GIN index serves.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::ports::{Collection, Persistence, PersistenceError, QueryFilter};

/// PostgreSQL document store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration, running migrations if enabled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PersistenceError> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        if config.run_migrations {
            store.run_migrations().await?;
        }
        Ok(store)
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), PersistenceError> {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PersistenceError::Database(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

/// Connection-level failures are worth a retry; everything else is a
/// database error.
fn map_sqlx_error(err: sqlx::Error) -> PersistenceError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => PersistenceError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            PersistenceError::Serialization(err.to_string())
        }
        other => PersistenceError::Database(other.to_string()),
    }
}

#[async_trait]
impl Persistence for PostgresStore {
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<Value>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection.name())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|r| r.try_get::<Value, _>("body"))
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: Value,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, body, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, key)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(collection.name())
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &QueryFilter,
    ) -> Result<Vec<Value>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY key
            "#,
        )
        .bind(collection.name())
        .bind(filter.to_json())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|r| r.try_get::<Value, _>("body"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }
}
