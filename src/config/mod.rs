//! Configuration management for the bridge
//!
//! This module handles loading and managing configuration settings
//! for both the HTTP server and the one-shot fetch mode.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    CacheSettings, LoggingSettings, NetworkSettings, ServerSettings, Settings, StorageSettings,
    UpstreamSettings,
};
