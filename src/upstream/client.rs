//! Mirror site client
//!
//! Every outbound request to the mirror goes through [`MirrorApi`] so the
//! caches, the scraper and the metadata lookups can be driven by a fake in
//! tests.

use crate::{Result, config::Settings, types::Service};
use reqwest::{Client, RequestBuilder, header};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const MOBILE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                             image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const METADATA_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                   (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Operations the bridge performs against the mirror site
#[async_trait::async_trait]
pub trait MirrorApi: Send + Sync + std::fmt::Debug {
    /// GET the landing page without cookies and return every `Set-Cookie` value in order
    async fn fetch_set_cookies(&self) -> Result<Vec<String>>;

    /// POST to the playlist endpoint with `cookie` and return the raw body
    async fn fetch_playlist(&self, cookie: &str) -> Result<String>;

    /// GET the mobile home page of `service`; non-2xx is an error
    async fn fetch_home(&self, service: Service, cookie: Option<&str>) -> Result<String>;

    /// GET the title metadata document for `id` and return the raw body
    async fn fetch_title(&self, service: Service, id: &str, cookie: Option<&str>)
    -> Result<String>;

    /// GET the episode listing of one season and return the raw body
    async fn fetch_episodes(
        &self,
        series_id: &str,
        season_id: &str,
        cookie: Option<&str>,
    ) -> Result<String>;
}

/// reqwest-backed [`MirrorApi`]
#[derive(Debug, Clone)]
pub struct MirrorClient {
    /// HTTP client
    client: Client,
    /// Endpoint and header configuration
    settings: Settings,
}

impl MirrorClient {
    /// Create a client from settings
    pub fn new(settings: Settings) -> Result<Self> {
        let client = super::network::build_http_client(&settings)?;
        Ok(Self { client, settings })
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    fn home_url(&self, service: Service) -> &str {
        match service {
            Service::Netflix => &self.settings.upstream.netflix_home_url,
            Service::AmazonPrime => &self.settings.upstream.prime_home_url,
        }
    }

    fn post_url(&self, service: Service) -> &str {
        match service {
            Service::Netflix => &self.settings.upstream.netflix_post_url,
            Service::AmazonPrime => &self.settings.upstream.prime_post_url,
        }
    }

    fn metadata_request(&self, url: &str, cookie: Option<&str>) -> RequestBuilder {
        with_cookie(
            self.client
                .get(url)
                .header(header::USER_AGENT, METADATA_USER_AGENT)
                .header(header::ACCEPT, "application/json")
                .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .header(header::REFERER, self.settings.upstream.referer.as_str()),
            cookie,
        )
    }
}

fn with_cookie(request: RequestBuilder, cookie: Option<&str>) -> RequestBuilder {
    match cookie {
        Some(cookie) => request.header(header::COOKIE, cookie),
        None => request,
    }
}

async fn send(request: RequestBuilder, url: &str) -> Result<reqwest::Response> {
    request.send().await.map_err(|e| {
        tracing::error!("Request to {} failed: {}", url, e);
        crate::Error::upstream(url.to_string(), e.to_string())
    })
}

#[async_trait::async_trait]
impl MirrorApi for MirrorClient {
    async fn fetch_set_cookies(&self) -> Result<Vec<String>> {
        let url = &self.settings.upstream.landing_url;
        tracing::info!("Fetching fresh cookies from {}", url);

        let request = self
            .client
            .get(url)
            .header(
                header::USER_AGENT,
                self.settings.network.desktop_user_agent.as_str(),
            )
            .header(header::ACCEPT, HTML_ACCEPT);
        let response = send(request, url).await?;

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        tracing::debug!(
            "Landing page answered {} with {} Set-Cookie header(s)",
            response.status(),
            cookies.len()
        );
        Ok(cookies)
    }

    async fn fetch_playlist(&self, cookie: &str) -> Result<String> {
        let url = &self.settings.upstream.playlist_url;
        tracing::debug!("Requesting playlist from {}", url);

        let request = self
            .client
            .post(url)
            .header(
                header::USER_AGENT,
                self.settings.network.desktop_user_agent.as_str(),
            )
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .header(header::REFERER, self.settings.upstream.referer.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::COOKIE, cookie);
        let response = send(request, url).await?;

        if !response.status().is_success() {
            return Err(crate::Error::upstream_status(
                url.clone(),
                response.status().as_u16(),
            ));
        }

        Ok(response.text().await?)
    }

    async fn fetch_home(&self, service: Service, cookie: Option<&str>) -> Result<String> {
        let url = self.home_url(service);
        tracing::debug!(
            "Fetching {} home page (cookie: {})",
            service,
            if cookie.is_some() { "yes" } else { "no" }
        );

        let request = with_cookie(
            self.client
                .get(url)
                .header(
                    header::USER_AGENT,
                    self.settings.network.mobile_user_agent.as_str(),
                )
                .header(header::ACCEPT, MOBILE_ACCEPT)
                .header(header::ACCEPT_LANGUAGE, "en-IN,en-US;q=0.9,en;q=0.8")
                .header(header::UPGRADE_INSECURE_REQUESTS, "1"),
            cookie,
        );
        let response = send(request, url).await?;

        if !response.status().is_success() {
            tracing::error!("Home page {} answered {}", url, response.status());
            return Err(crate::Error::upstream_status(
                url.to_string(),
                response.status().as_u16(),
            ));
        }

        Ok(response.text().await?)
    }

    async fn fetch_title(
        &self,
        service: Service,
        id: &str,
        cookie: Option<&str>,
    ) -> Result<String> {
        let base = self.post_url(service);
        let url = url::Url::parse_with_params(base, &[("id", id)])?;

        let response = send(self.metadata_request(url.as_str(), cookie), url.as_str()).await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            "{} metadata for {}: status {}, {} bytes",
            service,
            id,
            status,
            body.len()
        );
        Ok(body)
    }

    async fn fetch_episodes(
        &self,
        series_id: &str,
        season_id: &str,
        cookie: Option<&str>,
    ) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.settings.upstream.episodes_url,
            &[("s", season_id), ("series", series_id)],
        )?;

        let response = send(self.metadata_request(url.as_str(), cookie), url.as_str()).await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamSettings;
    use wiremock::matchers::{header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MirrorClient {
        let mut settings = Settings::default();
        settings.upstream = UpstreamSettings::with_base_url(&server.uri());
        MirrorClient::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_set_cookies_collects_every_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/p.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "t_hash=abc; Path=/")
                    .append_header("set-cookie", "t_hash_t=def; Path=/"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cookies = client_for(&server).fetch_set_cookies().await.unwrap();
        assert_eq!(
            cookies,
            vec!["t_hash=abc; Path=/".to_string(), "t_hash_t=def; Path=/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_set_cookies_without_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/p.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let cookies = client_for(&server).fetch_set_cookies().await.unwrap();
        assert!(cookies.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_playlist_sends_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pv/playlist.php"))
            .and(header_eq("cookie", "t_hash=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).fetch_playlist("t_hash=abc").await.unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_fetch_home_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mobile/home"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_home(Service::Netflix, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::UpstreamFetchFailed {
                status: Some(503),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_home_uses_service_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mobile/pv/home"))
            .and(query_param("app", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("prime"))
            .mount(&server)
            .await;

        let body = client_for(&server)
            .fetch_home(Service::AmazonPrime, Some("a=b"))
            .await
            .unwrap();
        assert_eq!(body, "prime");
    }

    #[tokio::test]
    async fn test_fetch_title_passes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post.php"))
            .and(query_param("id", "80057281"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"y"}"#))
            .mount(&server)
            .await;

        let body = client_for(&server)
            .fetch_title(Service::Netflix, "80057281", None)
            .await
            .unwrap();
        assert_eq!(body, r#"{"status":"y"}"#);
    }
}
