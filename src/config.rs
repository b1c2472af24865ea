use std::{env, net::SocketAddr, str::FromStr, time::Duration};

/// Application configuration loaded from environment variables.
///
/// - `BIND_ADDR` - listen address (default: "127.0.0.1:3000")
/// - `DATABASE_URL` - SQLite URL for the document store (default: "sqlite://todos.db")
/// - `REDIS_URL` - Redis cache URL; when unset an in-process cache is used
/// - `API_KEY` - shared secret required on every /api route
/// - `CACHE_TTL_SECONDS` - cache entry lifetime (default: 3600)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub api_key: String,
    pub cache_ttl: Duration,
    pub store: PoolConfig,
}

/// Connection pool bounds and timeouts for the document store.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: parsed("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000))),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://todos.db".to_string()),
            redis_url: env::var("REDIS_URL").ok(),
            api_key: env::var("API_KEY").unwrap_or_default(),
            cache_ttl: Duration::from_secs(parsed("CACHE_TTL_SECONDS", 3600)),
            store: PoolConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS", 5),
                min_connections: parsed("DB_MIN_CONNECTIONS", 0),
                acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECONDS", 30)),
                idle_timeout: Duration::from_secs(parsed("DB_IDLE_TIMEOUT_SECONDS", 600)),
                max_lifetime: Duration::from_secs(parsed("DB_MAX_LIFETIME_SECONDS", 1800)),
            },
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_defaults() {
        let pool = PoolConfig::default();
        assert_eq!(pool.max_connections, 5);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn parsed_falls_back_when_unset() {
        assert_eq!(parsed("TODOS_TEST_UNSET_KEY", 42u64), 42);
    }
}
