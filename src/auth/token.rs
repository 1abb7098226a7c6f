//! Streaming token derivation
//!
//! The mirror embeds a per-session token in the `file` URL of every playlist
//! source. The deriver posts to the playlist endpoint with the current
//! credential, finds the first token-shaped value and normalizes its trailing
//! tag to `ni`.

use crate::{
    Result,
    auth::{Clock, CredentialCache},
    types::Token,
    upstream::MirrorApi,
};
use chrono::Duration;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tokio::sync::RwLock;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

// Hex runs must not continue past the 32 characters on the left
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9a-fA-F])([0-9a-fA-F]{32}::[0-9a-fA-F]{32}::\d+)::[A-Za-z]+")
        .expect("Invalid token regex")
});

/// TTL cache around the derived streaming token
#[derive(Debug)]
pub struct TokenDeriver {
    credentials: Arc<CredentialCache>,
    upstream: Arc<dyn MirrorApi>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<Token>>,
}

impl TokenDeriver {
    /// Create an empty deriver
    pub fn new(
        credentials: Arc<CredentialCache>,
        upstream: Arc<dyn MirrorApi>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            upstream,
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Return the cached token while it and its credential are fresh,
    /// otherwise derive a new one
    pub async fn get_token(&self) -> Result<Token> {
        let now = self.clock.now();
        if let Some(token) = self
            .slot
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_fresh(now, self.ttl, self.credentials.ttl()))
        {
            tracing::debug!("Using cached streaming token");
            return Ok(token.clone());
        }

        let credential = self.credentials.get_credential().await.map_err(|e| {
            tracing::error!("Cannot derive token without a credential: {}", e);
            crate::Error::credential_unavailable(e.to_string())
        })?;

        let body = self.upstream.fetch_playlist(&credential.value).await?;
        let playlist: Value = serde_json::from_str(&body)
            .map_err(|e| crate::Error::invalid_json("playlist".to_string(), e.to_string()))?;

        let value = extract_token(&playlist)?;
        let token = Token {
            value,
            acquired_at: self.clock.now(),
            credential_acquired_at: credential.acquired_at,
        };
        tracing::info!("Derived fresh streaming token");

        *self.slot.write().await = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

/// Find the first token in a playlist document and normalize it
///
/// Items are scanned in order, then each item's `sources` in order. Only the
/// query string of a source `file` is searched.
pub fn extract_token(playlist: &Value) -> Result<String> {
    let items = match playlist.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(crate::Error::token_not_found(
                "playlist is not a non-empty array",
            ));
        }
    };

    items
        .iter()
        .filter_map(|item| item.get("sources").and_then(Value::as_array))
        .flatten()
        .filter_map(|source| source.get("file").and_then(Value::as_str))
        .find_map(|file| {
            let query = file.split_once('?').map_or("", |(_, query)| query);
            normalize(query)
        })
        .ok_or_else(|| crate::Error::token_not_found("no source file carries a token"))
}

/// Rewrite the first `<hex32>::<hex32>::<epoch>::<tag>` in `text` as
/// `in=<hex32>::<hex32>::<epoch>::ni`
pub fn normalize(text: &str) -> Option<String> {
    TOKEN_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|core| format!("in={}::ni", core.as_str()))
}
