//! PostgreSQL database client implementation.
//!
//! The pool is created lazily, the way serverless drivers behave: the
//! connection string is validated up front and the first connection is
//! opened by the first query.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::{AppError, DatabaseClient, DatabaseError};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Limits the number of queries in flight
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PostgresConfig {
    pub const DEFAULT_POOL_SIZE: u32 = 50;

    #[must_use]
    pub fn with_pool_size(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: Self::DEFAULT_POOL_SIZE,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

const POSTGRES_SCHEMES: [&str; 2] = ["postgres", "postgresql"];

/// Rejects connection strings that are not `postgres://` or `postgresql://`.
///
/// `PgConnectOptions` accepts any URL-shaped string, so this is the only
/// check that runs before the lazy pool is created.
fn ensure_postgres_scheme(url: &str) -> Result<(), DatabaseError> {
    match url.trim().split_once("://") {
        Some((scheme, _)) if POSTGRES_SCHEMES.iter().any(|s| scheme.eq_ignore_ascii_case(s)) => {
            Ok(())
        }
        Some((scheme, _)) => Err(DatabaseError::InvalidUrl(format!(
            "unsupported scheme '{scheme}', expected postgres:// or postgresql://"
        ))),
        None => Err(DatabaseError::InvalidUrl(
            "expected a postgres:// or postgresql:// URL".to_string(),
        )),
    }
}

/// Wraps a row-returning statement so each row comes back as one JSON object.
///
/// A CTE is used so `INSERT/UPDATE/DELETE ... RETURNING` work as well as
/// plain `SELECT`s.
fn row_json_query(sql: &str) -> String {
    let statement = sql
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("WITH q AS ({statement}) SELECT row_to_json(q)::jsonb AS row FROM q")
}

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a lazily-connecting client.
    ///
    /// Fails if the connection string is not a parseable `postgres://` or
    /// `postgresql://` URL. Must be called from within a Tokio runtime.
    pub fn new(database_url: &SecretString, config: PostgresConfig) -> Result<Self, AppError> {
        ensure_postgres_scheme(database_url.expose_secret())?;
        let options = PgConnectOptions::from_str(database_url.expose_secret())
            .map_err(|e| AppError::Database(DatabaseError::InvalidUrl(e.to_string())))?;
        info!(
            host = %options.get_host(),
            max_connections = config.max_connections,
            "Configured PostgreSQL pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client with default configuration
    pub fn with_defaults(database_url: &SecretString) -> Result<Self, AppError> {
        Self::new(database_url, PostgresConfig::default())
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn bind_all<'q>(
        mut query: Query<'q, Postgres, PgArguments>,
        params: &'q [String],
    ) -> Query<'q, Postgres, PgArguments> {
        for param in params {
            query = query.bind(param.as_str());
        }
        query
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self, params), fields(param_count = params.len()))]
    async fn execute(&self, sql: &str, params: &[String]) -> Result<u64, AppError> {
        let result = Self::bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, params), fields(param_count = params.len()))]
    async fn query(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let wrapped = row_json_query(sql);
        let rows = Self::bind_all(sqlx::query(&wrapped), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;

        rows.iter()
            .map(|row| {
                row.try_get::<serde_json::Value, _>("row")
                    .map_err(|e| AppError::Database(DatabaseError::from(e)))
            })
            .collect()
    }
}
