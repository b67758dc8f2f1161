use serde::Deserialize;
use thiserror::Error;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Transport, storage and configuration failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
        /// Whether the body was a structured auth-service error. Gateway and
        /// server pages leave this false and carry the raw body only.
        provider_payload: bool,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error payload shapes returned by the auth service. Older endpoints use the
/// OAuth `error`/`error_description` pair, newer ones `msg` plus `error_code`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
}

/// Builds an `AppError::Http` from a failed response, extracting the
/// provider's message and error code when the body is JSON.
pub fn http_error(status: u16, body: &str) -> AppError {
    let parsed = serde_json::from_str::<ErrorBody>(body.trim()).unwrap_or_default();
    let provider_payload = parsed.msg.is_some()
        || parsed.message.is_some()
        || parsed.error_description.is_some()
        || parsed.error.is_some();

    let code = parsed.error_code.or_else(|| {
        // `error` is only a code when a separate description is present.
        parsed
            .error_description
            .as_ref()
            .and(parsed.error.clone())
    });
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .map_or_else(|| sanitize_body(body), |message| sanitize_body(&message));

    AppError::Http {
        status,
        code,
        message,
        provider_payload,
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and
/// truncating.
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
