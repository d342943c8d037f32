//! Postgres connection pool.
//!
//! # Responsibilities
//! - Pick the production or test database URL
//! - Build the pool and prove it works with a round trip
//!
//! Schema, migrations and queries live elsewhere; this module only hands
//! out a ready pool.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("test mode requested but database.test_url is not set")]
    MissingTestUrl,

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// A verified connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    test_mode: bool,
}

impl Database {
    /// Connect and verify the pool.
    ///
    /// In test mode `test_url` is used instead of `url`. Bounded by
    /// `connect_timeout_secs`; there is no retry.
    pub async fn connect(config: &DatabaseConfig, test_mode: bool) -> Result<Self, DatabaseError> {
        let url = resolve_url(config, test_mode)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await?;

        let database = Self { pool, test_mode };
        database.ping().await?;

        tracing::info!(
            max_connections = config.max_connections,
            test_mode,
            "Database pool ready"
        );
        Ok(database)
    }

    /// Round trip to the server.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }
}

fn resolve_url(config: &DatabaseConfig, test_mode: bool) -> Result<&str, DatabaseError> {
    if test_mode {
        config.test_url.as_deref().ok_or(DatabaseError::MissingTestUrl)
    } else {
        Ok(&config.url)
    }
}
