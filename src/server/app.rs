//! Axum application setup
//!
//! Wires the caches, the scraper, the catalog store and the metadata service
//! into one shared state and mounts every route under `/api`.

use crate::{
    Result,
    auth::{Clock, CredentialCache, SystemClock, TokenDeriver},
    catalog::{CatalogService, CatalogStore},
    config::Settings,
    metadata::MetadataService,
    scrape::Scraper,
    types::CatalogId,
    upstream::{MirrorApi, MirrorClient},
};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use chrono::Duration;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Landing-page cookie cache
    pub credentials: Arc<CredentialCache>,
    /// Streaming token cache
    pub tokens: Arc<TokenDeriver>,
    /// Poster catalogs
    pub catalogs: Arc<CatalogService>,
    /// Title lookups
    pub metadata: Arc<MetadataService>,
    /// Application settings
    pub settings: Arc<Settings>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the state around an upstream implementation and a clock
    pub fn new(settings: Settings, upstream: Arc<dyn MirrorApi>, clock: Arc<dyn Clock>) -> Self {
        let credentials = Arc::new(CredentialCache::new(
            upstream.clone(),
            clock.clone(),
            seconds(settings.cache.credential_ttl_secs),
        ));
        let tokens = Arc::new(TokenDeriver::new(
            credentials.clone(),
            upstream.clone(),
            clock.clone(),
            seconds(settings.cache.token_ttl_secs),
        ));

        let scraper = Arc::new(Scraper::new(
            upstream.clone(),
            credentials.clone(),
            &settings.upstream,
        ));
        let store = Arc::new(CatalogStore::new(settings.storage.data_dir.clone(), clock));
        let catalogs = Arc::new(CatalogService::new(scraper, store));
        let metadata = Arc::new(MetadataService::new(upstream, credentials.clone()));

        Self {
            credentials,
            tokens,
            catalogs,
            metadata,
            settings: Arc::new(settings),
            start_time: std::time::Instant::now(),
        }
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000))
}

/// Create the application against the real mirror
pub fn create_app(settings: Settings) -> Result<Router> {
    let upstream: Arc<dyn MirrorApi> = Arc::new(MirrorClient::new(settings.clone())?);
    Ok(create_app_with(settings, upstream, Arc::new(SystemClock)))
}

/// Create the application with injected upstream and clock
pub fn create_app_with(
    settings: Settings,
    upstream: Arc<dyn MirrorApi>,
    clock: Arc<dyn Clock>,
) -> Router {
    let enable_cors = settings.server.enable_cors;
    let state = AppState::new(settings, upstream, clock);

    let router = Router::new()
        .route("/api/ping", get(super::handlers::ping))
        .route("/api/fetch-cookie", get(super::handlers::fetch_cookie))
        .route("/api/cookie-status", get(super::handlers::cookie_status))
        .route("/api/fetch-token", get(super::handlers::fetch_token))
        .route(
            "/api/invalidate-caches",
            post(super::handlers::invalidate_caches),
        )
        .route("/api/netflix", get(super::handlers::netflix_details))
        .route("/api/amazon-prime", get(super::handlers::amazon_prime_details));

    let router = catalog_routes(router, "/api/netflix/top10", CatalogId::NetflixTop10);
    let router = catalog_routes(router, "/api/netflix/posters", CatalogId::NetflixPosters);
    let router = catalog_routes(
        router,
        "/api/amazon-prime/posters",
        CatalogId::AmazonPrimePosters,
    );

    let router = if enable_cors {
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    } else {
        router.layer(TraceLayer::new_for_http())
    };

    router.with_state(state)
}

/// Mount `<base>`, `<base>/refresh` and `<base>/mark` for one catalog
fn catalog_routes(router: Router<AppState>, base: &str, catalog: CatalogId) -> Router<AppState> {
    use super::handlers::{mark_catalog, read_catalog, refresh_catalog};

    router
        .route(
            base,
            get(move |State(state): State<AppState>| read_catalog(state, catalog)),
        )
        .route(
            &format!("{base}/refresh"),
            post(move |State(state): State<AppState>| refresh_catalog(state, catalog)),
        )
        .route(
            &format!("{base}/mark"),
            post(move |State(state): State<AppState>, body: Bytes| {
                mark_catalog(state, catalog, body)
            }),
        )
}
