//! Upstream mirror access
//!
//! HTTP client construction and the [`MirrorApi`] seam every other component
//! uses to talk to the mirror site.

pub mod client;
pub mod network;

pub use client::{MirrorApi, MirrorClient};
pub use network::build_http_client;
