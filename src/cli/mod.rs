//! Command-line entry points
//!
//! `server` runs the HTTP API; `fetch` performs a one-shot acquisition and
//! prints the result as JSON.

pub mod fetch;
pub mod server;

use crate::{Settings, config::ConfigLoader};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Load settings for a CLI run
///
/// Precedence: CLI arguments (applied by the caller) > environment >
/// configuration file (`--config`, `NET51_CONFIG` or the default location) >
/// defaults. A broken configuration falls back to defaults with a warning.
pub fn load_settings(config: Option<&str>) -> Settings {
    let config_path = match config {
        Some(path) => Some(PathBuf::from(path)),
        None => ConfigLoader::get_config_path(),
    };

    ConfigLoader::new()
        .load(config_path.as_deref())
        .unwrap_or_else(|e| {
            // Logging is not initialized yet
            eprintln!(
                "Warning: Failed to load configuration: {}. Using defaults.",
                e
            );
            Settings::default()
        })
}

/// Log filter precedence: `--verbose` / `logging.verbose` > `RUST_LOG` > `logging.level`
pub fn log_filter(verbose: bool, configured_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(configured_level)
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init_logging(verbose: bool, settings: &Settings) {
    let _ = tracing_subscriber::registry()
        .with(log_filter(
            verbose || settings.logging.verbose,
            &settings.logging.level,
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
