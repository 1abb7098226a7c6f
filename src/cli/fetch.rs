//! One-shot fetch mode
//!
//! Acquires a cookie, a streaming token or a refreshed catalog once and
//! prints the same JSON body the HTTP API would return. Logs go to stderr.

use crate::{
    auth::SystemClock,
    error::format_error_for_logging,
    server::app::AppState,
    types::{
        CatalogId, ErrorResponse, FetchCookieResponse, FetchTokenResponse, RefreshResponse,
    },
    upstream::{MirrorApi, MirrorClient},
};
use anyhow::Result;
use std::sync::Arc;

/// What to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FetchTarget {
    /// Landing-page cookie string
    Cookie,
    /// Normalized streaming token
    Token,
    /// Refresh the Netflix top 10 catalog
    NetflixTop10,
    /// Refresh the full Netflix poster catalog
    NetflixPosters,
    /// Refresh the full Prime poster catalog
    AmazonPrimePosters,
}

impl FetchTarget {
    /// Catalog refreshed by this target, if any
    pub fn catalog(&self) -> Option<CatalogId> {
        match self {
            FetchTarget::Cookie | FetchTarget::Token => None,
            FetchTarget::NetflixTop10 => Some(CatalogId::NetflixTop10),
            FetchTarget::NetflixPosters => Some(CatalogId::NetflixPosters),
            FetchTarget::AmazonPrimePosters => Some(CatalogId::AmazonPrimePosters),
        }
    }
}

/// Arguments for fetch mode
#[derive(Debug)]
pub struct FetchArgs {
    pub target: FetchTarget,
    pub config: Option<String>,
    pub data_dir: Option<String>,
    pub verbose: bool,
}

/// Run fetch mode and print the JSON result to stdout
pub async fn run_fetch_mode(args: FetchArgs) -> Result<()> {
    let mut settings = super::load_settings(args.config.as_deref());
    if let Some(data_dir) = args.data_dir {
        settings.storage.data_dir = data_dir.into();
    }
    super::init_logging(args.verbose, &settings);

    let upstream: Arc<dyn MirrorApi> = Arc::new(MirrorClient::new(settings.clone())?);
    let state = AppState::new(settings, upstream, Arc::new(SystemClock));

    match fetch_json(&state, args.target).await {
        Ok(output) => {
            println!("{}", serde_json::to_string(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Fetch failed: {}", format_error_for_logging(&e));
            println!("{}", serde_json::to_string(&ErrorResponse::new(e.to_string()))?);
            Err(e.into())
        }
    }
}

/// Perform one fetch against `state` and render the response body
pub async fn fetch_json(state: &AppState, target: FetchTarget) -> crate::Result<serde_json::Value> {
    tracing::debug!("Fetch mode target: {:?}", target);

    let value = match (target, target.catalog()) {
        (_, Some(catalog)) => {
            let outcome = state.catalogs.refresh(catalog).await?;
            serde_json::to_value(RefreshResponse::from(outcome))?
        }
        (FetchTarget::Token, None) => {
            let token = state.tokens.get_token().await?;
            serde_json::to_value(FetchTokenResponse::new(token.value))?
        }
        (_, None) => {
            let credential = state.credentials.get_credential().await?;
            serde_json::to_value(FetchCookieResponse::new(credential.value))?
        }
    };

    Ok(value)
}
