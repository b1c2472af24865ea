use async_trait::async_trait;

use super::entity::Entity;
use crate::error::AppError;

/// Generic persistence contract, object-safe so stores can be shared as
/// `Arc<dyn Repository<T>>`.
///
/// Absence is never an error: `get` returns an empty vec and `delete`
/// returns `None` when nothing matches.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync + 'static {
    /// All entities matching the filter.
    async fn get(&self, filter: T::Filter) -> Result<Vec<T>, AppError>;

    /// Upsert by identifier: assigns a fresh identifier when the entity is
    /// new, otherwise replaces the stored record with the same identifier.
    async fn save(&self, entity: T) -> Result<T, AppError>;

    /// Remove and return the prior value, `None` when no record matches.
    async fn delete(&self, id: T::Id) -> Result<Option<T>, AppError>;

    /// Point lookup. The caching decorator overrides this with its
    /// read-through path.
    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, AppError> {
        Ok(self.get(T::by_id(id)).await?.into_iter().next())
    }
}

#[async_trait]
impl<T: Entity, R: Repository<T> + ?Sized> Repository<T> for std::sync::Arc<R> {
    async fn get(&self, filter: T::Filter) -> Result<Vec<T>, AppError> {
        (**self).get(filter).await
    }

    async fn save(&self, entity: T) -> Result<T, AppError> {
        (**self).save(entity).await
    }

    async fn delete(&self, id: T::Id) -> Result<Option<T>, AppError> {
        (**self).delete(id).await
    }

    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, AppError> {
        (**self).get_by_id(id).await
    }
}
