//! Error taxonomy for the bridge
//!
//! Every failure the credential/token caches, the scraper, the catalog store and
//! the metadata lookups can produce is classified here.

use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The landing page answered without any `Set-Cookie` header
    #[error("No Set-Cookie header received from {url}")]
    NoCookieReceived {
        /// Endpoint that was queried
        url: String,
    },

    /// A credential was required but could not be obtained
    #[error("Credential unavailable: {reason}")]
    CredentialUnavailable {
        /// Why the credential could not be acquired
        reason: String,
    },

    /// The playlist response carried no usable streaming token
    #[error("Streaming token not found: {reason}")]
    TokenNotFound {
        /// What was missing from the playlist response
        reason: String,
    },

    /// An upstream page or API could not be fetched
    #[error("Upstream fetch failed for {url}: {message}")]
    UpstreamFetchFailed {
        /// Requested URL
        url: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Human-readable description
        message: String,
    },

    /// An upstream response was not the JSON we expected
    #[error("Invalid JSON response from {context}: {message}")]
    InvalidJsonResponse {
        /// Which upstream call produced the body
        context: String,
        /// Parser message
        message: String,
    },

    /// Catalog storage read/write failures
    #[error("Storage error during {operation} on {path}: {details}")]
    Storage {
        /// Operation that failed (read, write, rename, ...)
        operation: String,
        /// File involved
        path: String,
        /// Detailed error description
        details: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Request validation errors
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Error message describing the validation failure
        message: String,
    },

    /// Upstream reported that the requested content does not exist
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing content
        what: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing-cookie error
    pub fn no_cookie_received(url: impl Into<String>) -> Self {
        Self::NoCookieReceived { url: url.into() }
    }

    /// Create a credential-unavailable error
    pub fn credential_unavailable(reason: impl Into<String>) -> Self {
        Self::CredentialUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a token-not-found error
    pub fn token_not_found(reason: impl Into<String>) -> Self {
        Self::TokenNotFound {
            reason: reason.into(),
        }
    }

    /// Create an upstream fetch error without a status code
    pub fn upstream<S: Into<String>>(url: S, message: S) -> Self {
        Self::UpstreamFetchFailed {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create an upstream fetch error for a non-2xx response
    pub fn upstream_status(url: impl Into<String>, status: u16) -> Self {
        Self::UpstreamFetchFailed {
            url: url.into(),
            status: Some(status),
            message: format!("unexpected status {}", status),
        }
    }

    /// Create an invalid-JSON error
    pub fn invalid_json<S: Into<String>>(context: S, message: S) -> Self {
        Self::InvalidJsonResponse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(operation: S, path: S, details: S) -> Self {
        Self::Storage {
            operation: operation.into(),
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    ///
    /// Nothing retries internally; this only tells callers whether asking
    /// again has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::NoCookieReceived { .. } => true,
            Error::CredentialUnavailable { .. } => true,
            Error::TokenNotFound { .. } => true,
            Error::UpstreamFetchFailed { status, .. } => {
                status.is_none_or(|code| code >= 500 || code == 429)
            }
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::NoCookieReceived { .. } => "no_cookie_received",
            Error::CredentialUnavailable { .. } => "credential_unavailable",
            Error::TokenNotFound { .. } => "token_not_found",
            Error::UpstreamFetchFailed { .. } => "upstream_fetch_failed",
            Error::InvalidJsonResponse { .. } => "invalid_json_response",
            Error::Storage { .. } => "storage",
            Error::Config { .. } => "config",
            Error::Validation { .. } => "validation",
            Error::NotFound { .. } => "not_found",
            Error::Internal { .. } => "internal",
        }
    }
}
