//! Common test utilities and helpers
//!
//! A scripted in-memory mirror, a frozen clock and HTML/JSON fixtures shared
//! by the integration tests.

#![allow(dead_code)]

use axum::{Router, body::Body, http::Request};
use chrono::{DateTime, Utc};
use net51_bridge::{
    Result, Settings,
    auth::ManualClock,
    server::create_app_with,
    types::Service,
    upstream::MirrorApi,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tower::ServiceExt;

pub const HEX_A: &str = "0123456789abcdef0123456789abcdef";
pub const HEX_B: &str = "fedcba9876543210fedcba9876543210";
pub const NETFLIX_CDN: &str = "https://imgcdn.kim/poster/v";
pub const PRIME_CDN: &str = "https://imgcdn.kim/pv/v";

/// Start of every test clock
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// In-memory mirror with scripted responses and call counters
#[derive(Debug, Default)]
pub struct FakeMirror {
    pub cookie_responses: Mutex<VecDeque<Vec<String>>>,
    pub playlist_body: Mutex<Option<String>>,
    pub home_pages: Mutex<HashMap<Service, String>>,
    pub titles: Mutex<HashMap<(Service, String), String>>,
    pub episodes: Mutex<HashMap<String, String>>,
    pub cookie_calls: AtomicUsize,
    pub playlist_calls: AtomicUsize,
    pub home_calls: AtomicUsize,
    pub last_home_cookie: Mutex<Option<Option<String>>>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one landing-page answer; the last one repeats
    pub fn with_cookies(self, headers: &[&str]) -> Self {
        self.cookie_responses
            .lock()
            .unwrap()
            .push_back(headers.iter().map(|h| h.to_string()).collect());
        self
    }

    pub fn with_playlist(self, body: impl Into<String>) -> Self {
        *self.playlist_body.lock().unwrap() = Some(body.into());
        self
    }

    pub fn with_home(self, service: Service, html: impl Into<String>) -> Self {
        self.set_home(service, html);
        self
    }

    pub fn set_home(&self, service: Service, html: impl Into<String>) {
        self.home_pages.lock().unwrap().insert(service, html.into());
    }

    pub fn with_title(self, service: Service, id: &str, body: impl Into<String>) -> Self {
        self.titles
            .lock()
            .unwrap()
            .insert((service, id.to_string()), body.into());
        self
    }

    pub fn with_episodes(self, season_id: &str, body: impl Into<String>) -> Self {
        self.episodes
            .lock()
            .unwrap()
            .insert(season_id.to_string(), body.into());
        self
    }

    pub fn cookie_calls(&self) -> usize {
        self.cookie_calls.load(Ordering::SeqCst)
    }

    pub fn playlist_calls(&self) -> usize {
        self.playlist_calls.load(Ordering::SeqCst)
    }

    pub fn home_calls(&self) -> usize {
        self.home_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MirrorApi for FakeMirror {
    async fn fetch_set_cookies(&self) -> Result<Vec<String>> {
        self.cookie_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.cookie_responses.lock().unwrap();
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(next.unwrap_or_default())
    }

    async fn fetch_playlist(&self, _cookie: &str) -> Result<String> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        self.playlist_body
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| net51_bridge::Error::upstream_status("playlist", 500))
    }

    async fn fetch_home(&self, service: Service, cookie: Option<&str>) -> Result<String> {
        self.home_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_home_cookie.lock().unwrap() = Some(cookie.map(str::to_string));
        self.home_pages
            .lock()
            .unwrap()
            .get(&service)
            .cloned()
            .ok_or_else(|| net51_bridge::Error::upstream_status(service.slug(), 503))
    }

    async fn fetch_title(
        &self,
        service: Service,
        id: &str,
        _cookie: Option<&str>,
    ) -> Result<String> {
        Ok(self
            .titles
            .lock()
            .unwrap()
            .get(&(service, id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_episodes(
        &self,
        _series_id: &str,
        season_id: &str,
        _cookie: Option<&str>,
    ) -> Result<String> {
        self.episodes
            .lock()
            .unwrap()
            .get(season_id)
            .cloned()
            .ok_or_else(|| net51_bridge::Error::upstream_status("episodes", 404))
    }
}

/// Settings pointing catalog storage at `data_dir`
pub fn test_settings(data_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.storage.data_dir = data_dir.path().to_path_buf();
    settings
}

/// Router, clock and data directory wired around `mirror`
pub struct TestApp {
    pub router: Router,
    pub mirror: Arc<FakeMirror>,
    pub clock: Arc<ManualClock>,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn new(mirror: FakeMirror) -> Self {
        let data_dir = TempDir::new().unwrap();
        let mirror = Arc::new(mirror);
        let clock = Arc::new(ManualClock::new(t0()));
        let router = create_app_with(test_settings(&data_dir), mirror.clone(), clock.clone());

        Self {
            router,
            mirror,
            clock,
            data_dir,
        }
    }

    /// Send a request and return status plus parsed JSON body (Null if empty)
    pub async fn send(&self, request: Request<Body>) -> (axum::http::StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (axum::http::StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: &str) -> (axum::http::StatusCode, serde_json::Value) {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Test data factory
pub struct MockData;

impl MockData {
    /// Playlist whose second source carries a token with tag `tag`
    pub fn playlist(tag: &str) -> String {
        serde_json::json!([
            {"title": "trailer", "sources": [{"file": "/hls/trailer.m3u8"}]},
            {"title": "main", "sources": [
                {"file": format!("/hls/81.m3u8?in={HEX_A}::{HEX_B}::1700000000::{tag}"), "label": "Full HD"}
            ]}
        ])
        .to_string()
    }

    /// Netflix home page with a top 10 row and a poster grid
    pub fn netflix_home(top10: &[&str], grid: &[&str]) -> String {
        let mut html = String::from("<html><body><div class=\"top10\">");
        for id in top10 {
            html.push_str(&format!(
                r#"<div class="swiper-slide top10-post" data-post="{id}"><img class="lazy" data-src="https://imgcdn.kim/poster/h/{id}.jpg"></div>"#
            ));
        }
        html.push_str("</div><div class=\"grid\">");
        for id in grid {
            html.push_str(&format!(
                r#"<a class="post-lazy" data-post="{id}"><img data-src="{NETFLIX_CDN}/{id}.jpg"></a>"#
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    /// Prime home page with a poster grid
    pub fn prime_home(grid: &[&str]) -> String {
        grid.iter()
            .map(|id| format!(r#"<a data-post="{id}"><img data-src="{PRIME_CDN}/{id}.jpg"></a>"#))
            .collect()
    }
}
