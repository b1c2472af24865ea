use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::cache::{Cache, CacheError, Result};

/// Redis cache backend using a connection manager for pooling and
/// automatic reconnects.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(transport)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(transport)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(transport)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(transport)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(transport)
    }
}

fn transport(e: redis::RedisError) -> CacheError {
    CacheError::Transport(e.to_string())
}
