//! Credential cache
//!
//! Holds the single live cookie string the mirror hands out on its landing
//! page. The slot is replaced wholesale on refresh and is never populated
//! with a failed or empty fetch.

use crate::{
    Result,
    auth::Clock,
    types::Credential,
    upstream::MirrorApi,
};
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default credential lifetime
pub const DEFAULT_CREDENTIAL_TTL_SECS: i64 = 3600;

/// TTL cache around the landing-page cookies
#[derive(Debug)]
pub struct CredentialCache {
    upstream: Arc<dyn MirrorApi>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<Credential>>,
}

impl CredentialCache {
    /// Create an empty cache
    pub fn new(upstream: Arc<dyn MirrorApi>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            upstream,
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Configured lifetime of a credential
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached credential while fresh, otherwise fetch a new one
    pub async fn get_credential(&self) -> Result<Credential> {
        if let Some(credential) = self.peek().await {
            tracing::debug!("Using cached Set-Cookie header");
            return Ok(credential);
        }

        self.refresh().await
    }

    /// Fetch a new credential regardless of the cached one
    pub async fn refresh(&self) -> Result<Credential> {
        let headers = self.upstream.fetch_set_cookies().await?;

        if headers.is_empty() {
            tracing::error!("No Set-Cookie headers found on landing page");
            return Err(crate::Error::no_cookie_received("landing page"));
        }

        let credential = Credential::from_set_cookie_headers(&headers, self.clock.now());
        tracing::info!(
            "Acquired fresh credential from {} Set-Cookie header(s), {} chars",
            headers.len(),
            credential.value.len()
        );

        *self.slot.write().await = Some(credential.clone());
        Ok(credential)
    }

    /// Cached credential if it is still fresh; never touches the network
    pub async fn peek(&self) -> Option<Credential> {
        let now = self.clock.now();
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|credential| credential.is_fresh(now, self.ttl))
            .cloned()
    }

    /// Drop the cached credential
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
        tracing::info!("Credential cache invalidated");
    }
}
