use async_trait::async_trait;
use log::error;
use sqlx::{Executor, PgPool, Postgres, Transaction};

use super::{decode_entries, email_taken, InsertOutcome, RecordStore};
use crate::errors::AppError;
use crate::models::employee::Employee;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv_hashes (
    hash TEXT NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (hash, field)
)";

const SELECT_ENTRIES: &str = "SELECT field, value FROM kv_hashes WHERE hash = $1";

const UPSERT_ENTRY: &str = "INSERT INTO kv_hashes (hash, field, value) VALUES ($1, $2, $3)
    ON CONFLICT (hash, field) DO UPDATE SET value = EXCLUDED.value";

/// The employee hash kept as `(hash, field, value)` rows of a PostgreSQL table.
///
/// Inserts run in a transaction holding an advisory lock keyed on the hash
/// name, so concurrent email checks serialize.
pub struct PgStore {
    pool: PgPool,
    hash: String,
}

fn map_sqlx_error(err: sqlx::Error) -> AppError {
    error!("Record store query failed: {}", err);
    AppError::DatabaseError(err.to_string())
}

impl PgStore {
    pub async fn connect(database_url: &str, hash: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await.map_err(map_sqlx_error)?;
        Self::with_pool(pool, hash).await
    }

    pub async fn with_pool(pool: PgPool, hash: &str) -> Result<Self, AppError> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Self {
            pool,
            hash: hash.to_string(),
        })
    }

    /// Opens a transaction and takes the per-hash write lock.
    async fn lock_hash(&self) -> Result<Transaction<'_, Postgres>, AppError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&self.hash)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(tx)
    }

    async fn entries<'e, E>(&self, executor: E) -> Result<Vec<(String, String)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, (String, String)>(SELECT_ENTRIES)
            .bind(&self.hash)
            .fetch_all(executor)
            .await
            .map_err(map_sqlx_error)
    }

    async fn upsert<'e, E>(&self, executor: E, employee: &Employee) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(UPSERT_ENTRY)
            .bind(&self.hash)
            .bind(&employee.id)
            .bind(employee.to_json()?)
            .execute(executor)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn as_pairs(rows: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> + '_ {
    rows.iter().map(|(field, value)| (field.as_str(), value.as_str()))
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let rows = self.entries(&self.pool).await?;
        Ok(decode_entries(as_pairs(&rows)))
    }

    async fn insert_unique(&self, employee: &Employee) -> Result<InsertOutcome, AppError> {
        let mut tx = self.lock_hash().await?;
        let rows = self.entries(&mut *tx).await?;

        if email_taken(as_pairs(&rows), &employee.email) {
            return Ok(InsertOutcome::DuplicateEmail);
        }
        if rows.iter().any(|(field, _)| field == &employee.id) {
            return Ok(InsertOutcome::DuplicateId);
        }

        self.upsert(&mut *tx, employee).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(InsertOutcome::Inserted)
    }

    async fn replace(&self, employee: &Employee) -> Result<(), AppError> {
        self.upsert(&self.pool, employee).await
    }

    async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM kv_hashes WHERE hash = $1 AND field = $2")
            .bind(&self.hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
