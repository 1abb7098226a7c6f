//! HTTP server implementation
//!
//! The JSON API consumed by the frontend, built on axum.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app, create_app_with};
