//! End-to-end tests through the reqwest client against a mocked mirror

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::{HEX_A, HEX_B, MockData};
use net51_bridge::{Settings, config::UpstreamSettings, server::create_app};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer, data_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.upstream = UpstreamSettings::with_base_url(&server.uri());
    settings.storage.data_dir = data_dir.path().to_path_buf();
    settings
}

async fn call(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tv/p.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "t_hash=abc; Path=/")
                .append_header("set-cookie", "t_hash_t=def; Path=/"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_flow_against_mirror() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    Mock::given(method("POST"))
        .and(path("/pv/playlist.php"))
        .and(header("cookie", "t_hash=abc; Path=/; t_hash_t=def; Path=/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MockData::playlist("su")))
        .expect(1)
        .mount(&server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let app = create_app(settings_for(&server, &data_dir)).unwrap();

    let (status, body) = call(&app, "GET", "/api/fetch-token").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["primeToken"],
        format!("in={HEX_A}::{HEX_B}::1700000000::ni")
    );

    // Served from cache; the mocks verify single calls on drop
    let (status, _) = call(&app, "GET", "/api/fetch-token").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_writes_catalog_file() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let cdn = format!("{}/img/pv", server.uri());
    Mock::given(method("GET"))
        .and(path("/mobile/pv/home"))
        .and(query_param("app", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a data-post="7"><img data-src="{cdn}/7.jpg"></a><a data-post="8"><img data-src="{cdn}/8.jpg"></a>"#
        )))
        .mount(&server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let mut settings = settings_for(&server, &data_dir);
    settings.upstream.prime_poster_cdn = cdn.clone();
    let app = create_app(settings).unwrap();

    let (status, body) = call(&app, "POST", "/api/amazon-prime/posters/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newCount"], 2);

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(data_dir.path().join("amazon-prime-posters-cache.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored["items"][1]["poster"], format!("{cdn}/8.jpg"));
    assert_eq!(stored["lastUpdated"], body["lastUpdated"]);
}

#[tokio::test]
async fn test_home_page_error_is_reported() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    Mock::given(method("GET"))
        .and(path("/mobile/home"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let app = create_app(settings_for(&server, &data_dir)).unwrap();

    let (status, body) = call(&app, "POST", "/api/netflix/top10/refresh").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(!data_dir.path().join("top10-cache.json").exists());
}

#[tokio::test]
async fn test_netflix_lookup_sends_cookie_and_id() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    Mock::given(method("GET"))
        .and(path("/post.php"))
        .and(query_param("id", "81"))
        .and(header("referer", "https://net51.cc/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"y","title":"Wednesday","season":[{"id":"9","episodes":[{},{}]}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let mut settings = settings_for(&server, &data_dir);
    settings.upstream.referer = "https://net51.cc/".to_string();
    let app = create_app(settings).unwrap();

    let (status, body) = call(&app, "GET", "/api/netflix?id=81").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Wednesday");
    assert_eq!(body["seasons"][0]["episodeCount"], 2);
}
