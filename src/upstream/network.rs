//! HTTP client construction
//!
//! Builds the shared reqwest client with timeouts and proxy settings taken
//! from the configuration.

use crate::{Result, config::Settings};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Build the reqwest client used for every upstream call
pub fn build_http_client(settings: &Settings) -> Result<Client> {
    let mut client_builder = Client::builder()
        .user_agent(settings.network.desktop_user_agent.as_str())
        .connect_timeout(Duration::from_secs(settings.network.connect_timeout))
        .timeout(Duration::from_secs(settings.network.request_timeout));

    if let Some(proxy_url) = settings.get_proxy_url() {
        let proxy = Proxy::all(&proxy_url).map_err(|e| {
            crate::Error::config("proxy", &format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
        tracing::debug!("Routing upstream traffic through proxy {}", proxy_url);
        client_builder = client_builder.proxy(proxy);
    }

    client_builder.build().map_err(|e| {
        crate::Error::config(
            "client_builder",
            &format!("Failed to create HTTP client: {}", e),
        )
    })
}
