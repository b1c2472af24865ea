use std::sync::Arc;

use todos_api::application::mediator::build_mediator;
use todos_api::config::Config;
use todos_api::domain::repository::Repository;
use todos_api::domain::todo::Todo;
use todos_api::http::routes::todos::AppState;
use todos_api::http::routing;
use todos_api::infrastructure::cache::{Cache, MemoryCache};
use todos_api::infrastructure::cached_repo::CachedRepository;
use todos_api::infrastructure::document_repo::DocumentRepository;
use todos_api::infrastructure::redis_cache::RedisCache;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    if config.api_key.is_empty() {
        tracing::warn!("API_KEY is not set; every API request will be rejected");
    }

    // Ensure a file-backed SQLite URL points at a creatable file.
    prepare_sqlite_file(&config.database_url)?;
    let store: DocumentRepository<Todo> =
        DocumentRepository::connect(&config.database_url, &config.store).await?;
    store.init().await?;

    let cache: Arc<dyn Cache> = match &config.redis_url {
        Some(url) => {
            tracing::info!(%url, "using redis cache");
            Arc::new(RedisCache::connect(url).await?)
        }
        None => {
            tracing::info!("REDIS_URL not set, using in-process cache");
            Arc::new(MemoryCache::new())
        }
    };

    let repo: Arc<dyn Repository<Todo>> =
        Arc::new(CachedRepository::new(store, cache, config.cache_ttl));
    let mediator = Arc::new(build_mediator(repo)?);
    let state = AppState {
        mediator,
        api_key: config.api_key.clone(),
    };
    let router = routing::app(state);

    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    if database_url.starts_with("sqlite::memory:") {
        return Ok(());
    }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        use std::{fs, fs::OpenOptions, path::Path};
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
