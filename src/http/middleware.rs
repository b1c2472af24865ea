use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::routes::todos::AppState;
use crate::error::AppError;

const SLOW_REQUEST: Duration = Duration::from_secs(1);
const VERY_SLOW_REQUEST: Duration = Duration::from_secs(5);

/// Shared-secret check: the key arrives in the `X-API-Key` header or the
/// `apiKey` query parameter. Health probes bypass the check. Rejections
/// happen here, before any handler runs.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if path == "/health" || path.starts_with("/health/") {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| query_api_key(request.uri().query()));

    let Some(provided) = provided else {
        tracing::warn!(path, "no API key provided");
        return AppError::Unauthorized.into_response();
    };

    if state.api_key.is_empty() || !provided.eq_ignore_ascii_case(&state.api_key) {
        tracing::warn!(path, "invalid API key provided");
        return AppError::Unauthorized.into_response();
    }

    tracing::debug!(path, "API key accepted");
    next.run(request).await
}

fn query_api_key(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("apiKey=").map(str::to_string))
}

/// Logs method, path, status and duration for every request; slow requests
/// escalate to warn above 1s and error above 5s.
pub async fn track_performance(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis() as u64;
    let status = response.status().as_u16();
    tracing::info!(%method, path, status, elapsed_ms, "request completed");
    if elapsed > VERY_SLOW_REQUEST {
        tracing::error!(%method, path, elapsed_ms, "very slow request");
    } else if elapsed > SLOW_REQUEST {
        tracing::warn!(%method, path, elapsed_ms, "slow request");
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_api_key_finds_the_pair() {
        assert_eq!(query_api_key(Some("apiKey=secret")), Some("secret".into()));
        assert_eq!(
            query_api_key(Some("other=1&apiKey=secret&x=2")),
            Some("secret".into())
        );
        assert_eq!(query_api_key(Some("other=1")), None);
        assert_eq!(query_api_key(None), None);
    }
}
