//! Response type definitions
//!
//! JSON bodies returned by the HTTP API. Field names follow the camelCase
//! shape the frontend already consumes.

use crate::types::{Catalog, PosterItem, RefreshOutcome};
use serde::{Deserialize, Serialize};

/// `GET /api/fetch-cookie` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchCookieResponse {
    /// Always true
    pub success: bool,
    /// Combined cookie string
    pub set_cookie_header: String,
}

impl FetchCookieResponse {
    /// Create a new cookie response
    pub fn new(set_cookie_header: impl Into<String>) -> Self {
        Self {
            success: true,
            set_cookie_header: set_cookie_header.into(),
        }
    }
}

/// `GET /api/cookie-status` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieStatusResponse {
    /// "success" or "failed"
    pub status: String,
    /// Whether a credential is available after the lookup
    pub has_cookie: bool,
    /// Whether the credential was served from cache without a network call
    pub cached: bool,
}

impl CookieStatusResponse {
    /// Create a status response
    pub fn new(has_cookie: bool, cached: bool) -> Self {
        Self {
            status: if has_cookie { "success" } else { "failed" }.to_string(),
            has_cookie,
            cached,
        }
    }
}

/// `GET /api/fetch-token` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTokenResponse {
    /// Always true
    pub success: bool,
    /// Normalized streaming token
    pub prime_token: String,
}

impl FetchTokenResponse {
    /// Create a new token response
    pub fn new(prime_token: impl Into<String>) -> Self {
        Self {
            success: true,
            prime_token: prime_token.into(),
        }
    }
}

/// `GET .../top10`, `GET .../posters` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    /// Always true
    pub success: bool,
    /// Items in display order
    pub items: Vec<PosterItem>,
    /// Unix epoch milliseconds
    pub last_updated: i64,
}

impl From<Catalog> for CatalogResponse {
    fn from(catalog: Catalog) -> Self {
        Self {
            success: true,
            items: catalog.items,
            last_updated: catalog.last_updated,
        }
    }
}

/// `POST .../refresh` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Always true
    pub success: bool,
    /// Items in display order
    pub items: Vec<PosterItem>,
    /// Unix epoch milliseconds
    pub last_updated: i64,
    /// Number of unseen items after the merge
    pub new_count: usize,
}

impl From<RefreshOutcome> for RefreshResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            success: true,
            items: outcome.catalog.items,
            last_updated: outcome.catalog.last_updated,
            new_count: outcome.new_count,
        }
    }
}

/// `POST .../mark` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkResponse {
    /// Always true
    pub success: bool,
    /// Updated items
    pub items: Vec<PosterItem>,
}

impl MarkResponse {
    /// Create a mark response
    pub fn new(items: Vec<PosterItem>) -> Self {
        Self {
            success: true,
            items,
        }
    }
}

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Fixed greeting, overridable with `PING_MESSAGE`
    pub message: String,

    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(message: impl Into<String>, server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            server_uptime,
            version: version.into(),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Generic error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
