//! Redis cache client.
//!
//! # Responsibilities
//! - Open the client from the configured URL
//! - Establish a multiplexed connection and verify it with PING
//! - Hand out cheap clones of that connection

use std::fmt;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::CacheConfig;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis did not answer within {0} seconds")]
    Timeout(u64),

    #[error("unexpected PING reply '{0}'")]
    UnexpectedReply(String),
}

/// A connected cache client.
#[derive(Clone)]
pub struct Cache {
    client: redis::Client,
    connection: MultiplexedConnection,
}

impl Cache {
    /// Connect and PING, both bounded by `connect_timeout_secs`.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url.as_str())?;
        let limit = Duration::from_secs(config.connect_timeout_secs);

        let connection = timeout(limit, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout_secs))??;

        let cache = Self { client, connection };
        timeout(limit, cache.ping())
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout_secs))??;

        tracing::info!("Cache connection ready");
        Ok(cache)
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        let reply: String = redis::cmd("PING").query_async(&mut connection).await?;
        if reply != "PONG" {
            return Err(CacheError::UnexpectedReply(reply));
        }
        Ok(())
    }

    /// A handle on the shared connection.
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    pub fn client(&self) -> &redis::Client {
        &self.client
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
