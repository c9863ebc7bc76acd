use std::future::Future;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PoolError {
    #[error("failed to open the database: {0}")]
    Open(sqlx::Error),
    #[error("failed to check out a connection from the pool: {0}")]
    Checkout(sqlx::Error),
}

/// Supplies exclusive database connections to the operation handlers.
///
/// Handlers are written against this trait rather than a concrete pool so
/// tests can substitute a provider whose checkout always fails. A checked
/// out connection returns to its pool when dropped; release never fails
/// observably, and dropping is the only way to release, so every handler
/// exit path releases exactly once.
pub trait ConnectionProvider: Send + Sync {
    fn acquire(
        &self,
    ) -> impl Future<Output = Result<PoolConnection<Sqlite>, PoolError>> + Send;
}

/// SQLite-backed pool over the accounts database.
#[derive(Clone)]
pub struct AccountPool {
    pool: SqlitePool,
}

impl AccountPool {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;

    pub async fn connect(url: &str) -> Result<AccountPool, PoolError> {
        AccountPool::with_max_connections(url, AccountPool::DEFAULT_MAX_CONNECTIONS).await
    }

    /// An in-memory SQLite database lives exactly as long as a connection
    /// to it, so tests cap the pool at a single shared connection.
    pub async fn with_max_connections(
        url: &str,
        max_connections: u32,
    ) -> Result<AccountPool, PoolError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(PoolError::Open)?;

        Ok(AccountPool { pool })
    }

    /// Create the two tables the handlers target, if this database has
    /// never been provisioned.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                account_id INTEGER PRIMARY KEY,
                balance REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS customers (
                customer_id INTEGER PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                age INTEGER NOT NULL,
                sex TEXT NOT NULL,
                activity TEXT NOT NULL,
                address TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl ConnectionProvider for AccountPool {
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, PoolError> {
        self.pool.acquire().await.map_err(PoolError::Checkout)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Provider whose pool is permanently exhausted.
    pub(crate) struct ExhaustedPool;

    impl ConnectionProvider for ExhaustedPool {
        async fn acquire(&self) -> Result<PoolConnection<Sqlite>, PoolError> {
            Err(PoolError::Checkout(sqlx::Error::PoolTimedOut))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent() {
        let pool = AccountPool::with_max_connections("sqlite::memory:", 1)
            .await
            .unwrap();

        pool.ensure_schema().await.unwrap();
        pool.ensure_schema().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let accounts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        assert_eq!(accounts, 0);
    }
}
