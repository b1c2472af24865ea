use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{Pool, Row, Sqlite, sqlite::SqlitePoolOptions};

use crate::config::PoolConfig;
use crate::domain::{entity::Entity, repository::Repository};
use crate::error::AppError;

/// Document-store adapter: one table per collection, one JSON document per
/// row (`id TEXT PRIMARY KEY, doc TEXT NOT NULL`).
///
/// Store errors are logged here and propagate unchanged; no retry at this
/// layer.
pub struct DocumentRepository<T> {
    pool: Arc<Pool<Sqlite>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> DocumentRepository<T> {
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(store_err("connect"))?;
        Ok(Self {
            pool: Arc::new(pool),
            _entity: PhantomData,
        })
    }

    /// Create the collection table when missing.
    pub async fn init(&self) -> Result<(), AppError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc TEXT NOT NULL)",
            T::COLLECTION
        );
        sqlx::query(&sql)
            .execute(&*self.pool)
            .await
            .map_err(store_err("init"))?;
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for DocumentRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn get(&self, filter: T::Filter) -> Result<Vec<T>, AppError> {
        // Exact-id filters hit the primary key; anything else scans the
        // collection and applies the predicate to each document.
        if let Some(id) = T::filter_id(&filter) {
            let sql = format!("SELECT doc FROM {} WHERE id = ?1", T::COLLECTION);
            let row = sqlx::query(&sql)
                .bind(id.to_string())
                .fetch_optional(&*self.pool)
                .await
                .map_err(store_err("get"))?;
            return match row {
                Some(row) => Ok(vec![decode(&row.get::<String, _>("doc"))?]),
                None => Ok(Vec::new()),
            };
        }

        let sql = format!("SELECT doc FROM {}", T::COLLECTION);
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(store_err("get"))?;
        let mut matched = Vec::new();
        for row in rows {
            let entity: T = decode(&row.get::<String, _>("doc"))?;
            if entity.matches(&filter) {
                matched.push(entity);
            }
        }
        Ok(matched)
    }

    async fn save(&self, mut entity: T) -> Result<T, AppError> {
        if entity.is_new() {
            entity.assign_fresh_id();
            let sql = format!("INSERT INTO {} (id, doc) VALUES (?1, ?2)", T::COLLECTION);
            sqlx::query(&sql)
                .bind(entity.id().to_string())
                .bind(encode(&entity)?)
                .execute(&*self.pool)
                .await
                .map_err(store_err("save"))?;
        } else {
            let sql = format!("UPDATE {} SET doc = ?2 WHERE id = ?1", T::COLLECTION);
            let result = sqlx::query(&sql)
                .bind(entity.id().to_string())
                .bind(encode(&entity)?)
                .execute(&*self.pool)
                .await
                .map_err(store_err("save"))?;
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound);
            }
        }
        Ok(entity)
    }

    async fn delete(&self, id: T::Id) -> Result<Option<T>, AppError> {
        // Single-statement find-and-remove.
        let sql = format!("DELETE FROM {} WHERE id = ?1 RETURNING doc", T::COLLECTION);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(store_err("delete"))?;
        row.map(|row| decode(&row.get::<String, _>("doc"))).transpose()
    }
}

fn encode<T: Serialize>(entity: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(entity)?)
}

fn decode<T: DeserializeOwned>(doc: &str) -> Result<T, AppError> {
    Ok(serde_json::from_str(doc)?)
}

fn store_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!(operation = op, error = %e, "store operation failed");
        AppError::Store(e)
    }
}
