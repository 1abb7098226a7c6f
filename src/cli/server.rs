//! Server mode CLI logic
//!
//! Loads configuration, initializes logging and serves the API.

use crate::{server::app, utils::version};
use anyhow::Result;

/// Arguments for server mode
#[derive(Debug)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub data_dir: Option<String>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    // Configuration is loaded before logging so logging.level can apply
    let mut settings = super::load_settings(args.config.as_deref());

    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        settings.storage.data_dir = data_dir.into();
    }
    settings.logging.verbose |= args.verbose;

    super::init_logging(settings.logging.verbose, &settings);

    tracing::info!("Starting {}", version::banner());
    tracing::info!("Catalog data directory: {:?}", settings.storage.data_dir);

    let app = app::create_app(settings.clone())?;

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;

    tracing::info!("{} listening on {}", version::banner(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse host string and attempt to bind to the address
///
/// `::` is tried first and falls back to `0.0.0.0` when IPv6 is unavailable.
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if host == "::" {
        let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
        return match tokio::net::TcpListener::bind(addr).await {
            Ok(_) => {
                tracing::debug!("IPv6 any address {} is available", addr);
                Ok(addr)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                    port,
                    e
                );
                Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
            }
        };
    }

    match host.parse::<IpAddr>() {
        Ok(ip) => Ok(SocketAddr::new(ip, port)),
        Err(_) => anyhow::bail!(
            "Invalid host address: {}. Use an IP address, '::' or '0.0.0.0'",
            host
        ),
    }
}
