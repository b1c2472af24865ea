pub mod cache;
pub mod cached_repo;
pub mod document_repo;
pub mod redis_cache;
