//! Error formatting utilities
//!
//! Server-side logs get the full cause chain; HTTP clients only ever see a
//! generic message so upstream details never leak into the UI.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display, including nested causes
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::UpstreamFetchFailed {
            url,
            status: Some(status),
            message,
        } => format!("Upstream fetch failed for {} (HTTP {}): {}", url, status, message),

        Error::Storage {
            operation,
            path,
            details,
        } => format!("Storage {} failed for '{}': {}", operation, path, details),

        // For everything else the Display implementation is already descriptive
        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Generic, client-facing message for an error raised in `context`
///
/// `context` names the operation the handler attempted, e.g. "fetch cookie".
pub fn public_message(error: &Error, context: &str) -> String {
    match error {
        Error::Validation { message, .. } => message.clone(),
        Error::NotFound { what } => what.clone(),
        _ => format!("Failed to {}", context),
    }
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "retryable": error.is_retryable(),
    });

    match error {
        Error::UpstreamFetchFailed {
            url,
            status: Some(status),
            ..
        } => {
            log_data["url"] = serde_json::Value::String(url.clone());
            log_data["status"] = serde_json::Value::Number((*status).into());
        }
        Error::UpstreamFetchFailed { url, .. } | Error::NoCookieReceived { url } => {
            log_data["url"] = serde_json::Value::String(url.clone());
        }
        Error::Storage { path, .. } => {
            log_data["path"] = serde_json::Value::String(path.clone());
        }
        _ => {}
    }

    log_data
}
