//! Version information
//!
//! Used by the ping endpoint and the startup log lines.

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the current application version
pub fn get_version() -> &'static str {
    VERSION
}

/// `<name> v<version>`, optionally suffixed with the build's git hash
pub fn banner() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) => format!("{} v{} ({})", NAME, VERSION, hash),
        None => format!("{} v{}", NAME, VERSION),
    }
}
