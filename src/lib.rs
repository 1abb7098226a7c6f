//! net51 bridge
//!
//! Backend for a browser frontend that browses the net51 streaming mirror.
//! It keeps the mirror's session cookie and streaming token warm, scrapes the
//! Netflix and Prime home pages into persisted poster catalogs and reshapes
//! title metadata into a stable JSON shape.
//!
//! # Architecture
//!
//! - [`upstream`]: the [`MirrorApi`](upstream::MirrorApi) seam and its reqwest client
//! - [`auth`]: TTL caches for the cookie credential and the derived token
//! - [`scrape`]: home page fetching and poster extraction
//! - [`catalog`]: JSON-file catalogs with carry-forward merge and seen flags
//! - [`metadata`]: Netflix and Prime title lookups
//! - [`server`]: the axum router under `/api`
//!
//! # Usage
//!
//! ```bash
//! net51-bridge server --port 8080 --data-dir ./data
//! net51-bridge fetch token
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use net51_bridge::{Settings, server::create_app};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let app = create_app(Settings::default())?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod scrape;
pub mod server;
pub mod types;
pub mod upstream;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use types::{Catalog, CatalogId, ErrorResponse, PingResponse, PosterItem};
