//! Read-only SQLite access for the stipend database
//!
//! Uses a sqlx `SqlitePool` opened with `read_only(true)`; the dashboard
//! never writes. Every query goes through the shared `QueryCache`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bolsactl_core::{BolsaError, SqlParam, SqlQuery, SqlValue};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::cache::QueryCache;
use crate::result_set::ResultSet;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] BolsaError),
}

/// Pool and cache settings
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub busy_timeout: Duration,
    pub max_connections: u32,
    pub cache_enabled: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(30),
            max_connections: 4,
            cache_enabled: true,
        }
    }
}

/// Handle to the stipend database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
    cache: Arc<QueryCache>,
}

impl Database {
    /// Open the database read-only.
    ///
    /// # Errors
    ///
    /// `BolsaError::DatabaseMissing` when the file does not exist; the file
    /// is never created.
    pub async fn open(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(BolsaError::database_missing(&path).into());
        }

        let connect = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(false)
            .read_only(true)
            .busy_timeout(options.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections.max(1))
            .connect_with(connect)
            .await?;

        info!(
            path = %path.display(),
            cache = options.cache_enabled,
            "Opened stipend database (read-only)"
        );

        Ok(Self {
            pool,
            path,
            cache: Arc::new(QueryCache::new(options.cache_enabled)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database file size in bytes
    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run `query`, serving repeated query/parameter combinations from the cache
    pub async fn fetch(&self, query: &SqlQuery) -> Result<Arc<ResultSet>, DbError> {
        if let Some(hit) = self.cache.get(query).await {
            debug!(sql = query.sql(), "cache hit");
            return Ok(hit);
        }

        let result = Arc::new(self.fetch_uncached(query).await?);
        self.cache.insert(query.clone(), Arc::clone(&result)).await;
        Ok(result)
    }

    /// Run `query` against the database, bypassing the cache
    pub async fn fetch_uncached(&self, query: &SqlQuery) -> Result<ResultSet, DbError> {
        debug!(sql = query.sql(), params = query.params().len(), "executing query");

        let mut q = sqlx::query(query.sql());
        for param in query.params() {
            q = match param {
                SqlParam::Text(s) => q.bind(s.clone()),
                SqlParam::Integer(i) => q.bind(*i),
                SqlParam::Real(f) => q.bind(*f),
            };
        }

        let rows = q.fetch_all(&self.pool).await?;
        if rows.is_empty() {
            let columns = self.column_names(query).await?;
            return Ok(ResultSet::new(columns, Vec::new()));
        }
        Ok(decode_rows(&rows)?)
    }

    /// Column names from the prepared statement, for results with no rows
    async fn column_names(&self, query: &SqlQuery) -> Result<Vec<String>, DbError> {
        let statement = (&self.pool).prepare(query.sql()).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Decode a non-empty row list; column names come from the first row
fn decode_rows(rows: &[SqliteRow]) -> Result<ResultSet, sqlx::Error> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| decode_cell(row, i)).collect())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultSet::new(columns, rows))
}

/// Decode by the value's runtime storage class, not the declared column type
fn decode_cell(row: &SqliteRow, idx: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let storage = raw.type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get(idx)?),
        "REAL" => SqlValue::Real(row.try_get(idx)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(idx)?;
            SqlValue::Text(format!("<{} bytes>", bytes.len()))
        }
        _ => SqlValue::Text(row.try_get(idx)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_db;

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bolsa_atleta.db");

        let err = Database::open(&path, OpenOptions::default())
            .await
            .err()
            .expect("open should fail");

        assert!(matches!(
            err,
            DbError::Core(BolsaError::DatabaseMissing { .. })
        ));
        assert!(err.to_string().contains("Banco de dados não encontrado"));
        assert!(!path.exists(), "open must not create the file");
    }

    #[tokio::test]
    async fn test_decodes_storage_classes() {
        let (_dir, db) = fixture_db().await;
        let rs = db
            .fetch(&SqlQuery::new(
                "SELECT 1 AS i, 2.5 AS r, 'SP' AS t, NULL AS n",
            ))
            .await
            .unwrap();

        assert_eq!(rs.columns, vec!["i", "r", "t", "n"]);
        assert_eq!(
            rs.rows[0],
            vec![
                SqlValue::Integer(1),
                SqlValue::Real(2.5),
                SqlValue::Text("SP".into()),
                SqlValue::Null
            ]
        );
    }

    #[tokio::test]
    async fn test_binds_params_in_order() {
        let (_dir, db) = fixture_db().await;
        let query = SqlQuery::new("SELECT COUNT(*) AS n FROM pagamento WHERE cpf = ")
            .push_bind("111")
            .push(" AND valor_pago >= ")
            .push_bind(900.0);

        let rs = db.fetch(&query).await.unwrap();
        assert_eq!(rs.scalar_i64("n"), 2);
    }

    #[tokio::test]
    async fn test_repeated_query_hits_cache() {
        let (_dir, db) = fixture_db().await;
        let query = SqlQuery::new("SELECT COUNT(*) AS n FROM pagamento");

        let first = db.fetch(&query).await.unwrap();
        let second = db.fetch(&query).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = db.cache().stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_connection_is_read_only() {
        let (_dir, db) = fixture_db().await;
        let result = db
            .fetch_uncached(&SqlQuery::new("DELETE FROM pagamento"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_result_keeps_column_names() {
        let (_dir, db) = fixture_db().await;
        let rs = db
            .fetch(&SqlQuery::new("SELECT * FROM pagamento WHERE cpf = ").push_bind("000"))
            .await
            .unwrap();
        assert!(rs.is_empty());
        assert_eq!(rs.columns.len(), 9);
        assert_eq!(rs.columns[0], "id_pagamento");
    }
}
