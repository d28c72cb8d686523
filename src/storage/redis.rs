//! Redis-backed store
//!
//! Each mapping lives under `<key_prefix><slug>` with a TTL (one year by
//! default) so abandoned mappings are reclaimed automatically. `save` is a
//! single `SET ... NX EX`, which closes the exists/save race the other
//! backends can only approximate. Connection establishment and every
//! command carry their own deadline; a timed-out or failed call surfaces
//! as `StorageUnavailable` instead of hanging the handler.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::LinkStore;
use crate::config::Config;
use crate::errors::{Result, ShortlinkError};

pub struct RedisStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: RwLock<Option<MultiplexedConnection>>,
    key_prefix: String,
    ttl_secs: u64,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl RedisStore {
    /// Create the store and establish the initial connection, so a
    /// misconfigured Redis URL fails at startup rather than on the first
    /// request.
    pub async fn connect(config: &Config) -> Result<Self> {
        let redis_config = &config.storage.redis;
        let url = redis_config.url.as_deref().ok_or_else(|| {
            ShortlinkError::storage_unavailable("redis backend selected but no Redis URL configured")
        })?;

        let client = redis::Client::open(url)
            .map_err(|e| ShortlinkError::storage_unavailable(format!("invalid Redis URL: {e}")))?;

        let store = Self {
            client,
            connection: RwLock::new(None),
            key_prefix: redis_config.key_prefix.clone(),
            ttl_secs: redis_config.ttl_secs,
            connect_timeout: Duration::from_secs(redis_config.connect_timeout_secs),
            response_timeout: Duration::from_secs(redis_config.response_timeout_secs),
        };

        store.connection().await?;
        debug!(
            "RedisStore connected, prefix '{}', TTL {}s",
            store.key_prefix, store.ttl_secs
        );
        Ok(store)
    }

    /// Get the cached multiplexed connection, establishing it if needed.
    async fn connection(&self) -> Result<MultiplexedConnection> {
        {
            let guard = self.connection.read().await;
            if let Some(conn) = guard.as_ref() {
                return Ok(conn.clone());
            }
        }

        let mut guard = self.connection.write().await;
        // 双重检查，避免竞态条件
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let connect = self.client.get_multiplexed_async_connection();
        let conn = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| {
                ShortlinkError::storage_unavailable(format!(
                    "redis connection timed out after {}s",
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                ShortlinkError::storage_unavailable(format!("redis connection failed: {e}"))
            })?;

        *guard = Some(conn.clone());
        debug!("redis connection established and cached");
        Ok(conn)
    }

    /// Drop the cached connection so the next call reconnects.
    async fn reset_connection(&self) {
        let mut guard = self.connection.write().await;
        *guard = None;
        warn!("redis connection reset due to error");
    }

    fn make_key(&self, slug: &str) -> String {
        format!("{}{}", self.key_prefix, slug)
    }

    /// Run one command under the response deadline. Both a Redis error and
    /// a timeout reset the cached connection and surface as
    /// `StorageUnavailable`.
    async fn bounded<T>(
        &self,
        op: &str,
        command: impl Future<Output = redis::RedisResult<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.response_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                self.reset_connection().await;
                Err(ShortlinkError::storage_unavailable(format!(
                    "redis {op} failed: {e}"
                )))
            }
            Err(_) => {
                self.reset_connection().await;
                Err(ShortlinkError::storage_unavailable(format!(
                    "redis {op} timed out after {}s",
                    self.response_timeout.as_secs()
                )))
            }
        }
    }
}

#[async_trait]
impl LinkStore for RedisStore {
    async fn save(&self, slug: &str, url: &str) -> Result<bool> {
        let key = self.make_key(slug);
        let mut conn = self.connection().await?;

        // SET NX EX: store only if absent, with expiry, in one round trip
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key)
            .arg(url)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs);

        let stored = self
            .bounded("SET", cmd.query_async::<Option<String>>(&mut conn))
            .await?;
        Ok(stored.is_some())
    }

    async fn get(&self, slug: &str) -> Result<Option<String>> {
        let key = self.make_key(slug);
        let mut conn = self.connection().await?;

        self.bounded("GET", conn.get::<_, Option<String>>(&key))
            .await
    }

    async fn exists(&self, slug: &str) -> Result<bool> {
        let key = self.make_key(slug);
        let mut conn = self.connection().await?;

        self.bounded("EXISTS", conn.exists::<_, bool>(&key)).await
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
