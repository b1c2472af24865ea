use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;

/// Stable JSON shape returned for every failed request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::MissingArgument => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Store(sqlx::Error::PoolTimedOut) => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NotFound",
            AppError::Validation(_) | AppError::MissingArgument => "BadRequest",
            AppError::Unauthorized => "Unauthorized",
            AppError::Timeout | AppError::Store(sqlx::Error::PoolTimedOut) => "Timeout",
            _ => "Error",
        }
    }

    /// Message safe to return to the caller. Unclassified errors keep
    /// their detail out of the response body.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound => "Data could not be found.".to_string(),
            AppError::Validation(message) => message.clone(),
            AppError::MissingArgument => "A required argument was missing.".to_string(),
            AppError::Unauthorized => "Invalid or missing API key.".to_string(),
            AppError::Timeout | AppError::Store(sqlx::Error::PoolTimedOut) => {
                "The request timed out.".to_string()
            }
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

/// Carried through response extensions so the translation middleware can
/// render the body with the request path.
#[derive(Debug, Clone)]
pub struct TranslatedError {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(TranslatedError {
            code: self.error_code(),
            message: self.public_message(),
        });
        response
    }
}

/// Top-level error translator: turns every failed response into the stable
/// JSON shape. Rejections produced by the framework (missing body fields,
/// wrong content type) are normalized to a 400 with a generic message.
pub async fn translate_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    if let Some(err) = parts.extensions.remove::<TranslatedError>() {
        return render(parts.status, err.code, err.message, path);
    }

    if parts.status == StatusCode::UNPROCESSABLE_ENTITY
        || parts.status == StatusCode::UNSUPPORTED_MEDIA_TYPE
    {
        let missing = AppError::MissingArgument;
        return render(
            StatusCode::BAD_REQUEST,
            missing.error_code(),
            missing.public_message(),
            path,
        );
    }

    if parts.status.is_client_error() || parts.status.is_server_error() {
        let code = if parts.status == StatusCode::NOT_FOUND {
            "NotFound"
        } else if parts.status.is_client_error() {
            "BadRequest"
        } else {
            "Error"
        };
        let message = parts
            .status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
        return render(parts.status, code, message, path);
    }

    Response::from_parts(parts, body)
}

fn render(status: StatusCode, code: &'static str, message: String, path: String) -> Response {
    let body = ErrorBody {
        error_code: code,
        message,
        timestamp: Utc::now(),
        path,
    };
    (status, Json(body)).into_response()
}
