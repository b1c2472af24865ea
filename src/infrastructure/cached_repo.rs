use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::cache::Cache;
use crate::domain::{entity::Entity, repository::Repository};
use crate::error::AppError;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Read-through/write-through caching decorator over any [`Repository`].
///
/// Entities are cached under `"<collection>:<id>"`; saving or deleting an
/// entity also removes its grouping-key entry so list-style lookups cannot
/// go stale. Cache failures are soft: a read error counts as a miss and a
/// write error never fails the surrounding operation.
pub struct CachedRepository<T, R> {
    inner: R,
    cache: Arc<dyn Cache>,
    ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, R> CachedRepository<T, R> {
    pub fn new(inner: R, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            inner,
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    fn id_key(id: &T::Id) -> String {
        format!("{}:{}", T::COLLECTION, id)
    }
}

impl<T, R> CachedRepository<T, R>
where
    T: Entity + Serialize,
{
    async fn write_through(&self, key: &str, entity: &T) {
        let bytes = match serde_json::to_vec(entity) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };
        match self.cache.set(key, &bytes, self.ttl).await {
            Ok(()) => tracing::debug!(key, "cached entity"),
            Err(e) => tracing::warn!(key, error = %e, "cache write failed"),
        }
    }

    async fn evict(&self, key: &str) {
        match self.cache.remove(key).await {
            Ok(()) => tracing::debug!(key, "removed cache entry"),
            Err(e) => tracing::warn!(key, error = %e, "cache removal failed"),
        }
    }

    async fn invalidate_group(&self, entity: &T) {
        if let Some(key) = entity.group_key() {
            self.evict(&key).await;
        }
    }
}

#[async_trait]
impl<T, R> Repository<T> for CachedRepository<T, R>
where
    T: Entity + Serialize + DeserializeOwned,
    R: Repository<T>,
{
    /// Arbitrary filters are not reducible to a stable key, so they bypass
    /// the cache entirely.
    async fn get(&self, filter: T::Filter) -> Result<Vec<T>, AppError> {
        self.inner.get(filter).await
    }

    async fn save(&self, entity: T) -> Result<T, AppError> {
        let saved = self.inner.save(entity).await?;
        self.write_through(&Self::id_key(saved.id()), &saved).await;
        self.invalidate_group(&saved).await;
        Ok(saved)
    }

    async fn delete(&self, id: T::Id) -> Result<Option<T>, AppError> {
        let deleted = self.inner.delete(id.clone()).await?;
        if let Some(entity) = &deleted {
            self.evict(&Self::id_key(&id)).await;
            self.invalidate_group(entity).await;
        }
        Ok(deleted)
    }

    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, AppError> {
        let key = Self::id_key(&id);
        match self.cache.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(entity) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(Some(entity));
                }
                Err(e) => tracing::warn!(key, error = %e, "discarding undecodable cache entry"),
            },
            Ok(None) => tracing::debug!(key, "cache miss"),
            Err(e) => tracing::warn!(key, error = %e, "cache read failed"),
        }

        let entity = self.inner.get_by_id(id).await?;
        if let Some(entity) = &entity {
            self.write_through(&key, entity).await;
        }
        Ok(entity)
    }
}
