//! Type definitions for the bridge
//!
//! This module contains the main data structures used for caching, storage,
//! requests and responses.

pub mod catalog;
pub mod credential;
pub mod request;
pub mod response;

pub use catalog::{
    Catalog, CatalogId, CatalogKind, PosterItem, RefreshOutcome, ScrapedPoster, Service,
};
pub use credential::{Credential, Token};
pub use request::{LookupQuery, MarkRequest};
pub use response::{
    CatalogResponse, CookieStatusResponse, ErrorResponse, FetchCookieResponse,
    FetchTokenResponse, MarkResponse, PingResponse, RefreshResponse,
};
