//! Configuration settings
//!
//! Provides configuration loading from environment variables,
//! configuration files, and command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Helper functions for serde defaults
fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "::".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_landing_url() -> String {
    "https://net51.cc/tv/p.php".to_string()
}

fn default_playlist_url() -> String {
    "https://net20.cc/pv/playlist.php".to_string()
}

fn default_netflix_home_url() -> String {
    "https://net51.cc/mobile/home?app=1".to_string()
}

fn default_prime_home_url() -> String {
    "https://net51.cc/mobile/pv/home?app=1".to_string()
}

fn default_netflix_post_url() -> String {
    "https://net20.cc/post.php".to_string()
}

fn default_prime_post_url() -> String {
    "https://net20.cc/pv/post.php".to_string()
}

fn default_episodes_url() -> String {
    "https://net51.cc/episodes.php".to_string()
}

fn default_referer() -> String {
    "https://net51.cc/".to_string()
}

fn default_netflix_poster_cdn() -> String {
    "https://imgcdn.kim/poster/v".to_string()
}

fn default_prime_poster_cdn() -> String {
    "https://imgcdn.kim/pv/v".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    30
}

fn default_desktop_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_mobile_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 13; Pixel 5 Build/TQ3A.230901.001; wv) AppleWebKit/537.36 \
     (KHTML, like Gecko) Version/4.0 Chrome/139.0.7258.158 Safari/537.36 /OS.Gatu v3.0"
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("server").join("data")
}

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Upstream mirror endpoints
    #[serde(default)]
    pub upstream: UpstreamSettings,
    /// Credential/token cache configuration
    #[serde(default)]
    pub cache: CacheSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Catalog storage configuration
    #[serde(default)]
    pub storage: StorageSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

/// Upstream mirror endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Landing page that hands out the session cookies
    #[serde(default = "default_landing_url")]
    pub landing_url: String,
    /// Playlist endpoint used to derive the streaming token
    #[serde(default = "default_playlist_url")]
    pub playlist_url: String,
    /// Netflix mobile home page (poster grids)
    #[serde(default = "default_netflix_home_url")]
    pub netflix_home_url: String,
    /// Prime mobile home page (poster grids)
    #[serde(default = "default_prime_home_url")]
    pub prime_home_url: String,
    /// Netflix title metadata endpoint
    #[serde(default = "default_netflix_post_url")]
    pub netflix_post_url: String,
    /// Prime title metadata endpoint
    #[serde(default = "default_prime_post_url")]
    pub prime_post_url: String,
    /// Season episode listing endpoint
    #[serde(default = "default_episodes_url")]
    pub episodes_url: String,
    /// Referer sent with metadata lookups
    #[serde(default = "default_referer")]
    pub referer: String,
    /// CDN prefix of Netflix poster images (`<prefix>/<id>.jpg`)
    #[serde(default = "default_netflix_poster_cdn")]
    pub netflix_poster_cdn: String,
    /// CDN prefix of Prime poster images (`<prefix>/<id>.jpg`)
    #[serde(default = "default_prime_poster_cdn")]
    pub prime_poster_cdn: String,
}

/// Credential and token cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Credential (cookie) TTL in seconds
    #[serde(default = "default_ttl_secs")]
    pub credential_ttl_secs: u64,
    /// Streaming token TTL in seconds
    #[serde(default = "default_ttl_secs")]
    pub token_ttl_secs: u64,
}

/// Network and proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// HTTPS proxy URL
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// All protocols proxy URL
    #[serde(default)]
    pub all_proxy: Option<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// User agent for the landing page, playlist and metadata calls
    #[serde(default = "default_desktop_user_agent")]
    pub desktop_user_agent: String,
    /// User agent for the mobile home page scrape
    #[serde(default = "default_mobile_user_agent")]
    pub mobile_user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Catalog storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the catalog JSON files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            landing_url: default_landing_url(),
            playlist_url: default_playlist_url(),
            netflix_home_url: default_netflix_home_url(),
            prime_home_url: default_prime_home_url(),
            netflix_post_url: default_netflix_post_url(),
            prime_post_url: default_prime_post_url(),
            episodes_url: default_episodes_url(),
            referer: default_referer(),
            netflix_poster_cdn: default_netflix_poster_cdn(),
            prime_poster_cdn: default_prime_poster_cdn(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            credential_ttl_secs: default_ttl_secs(),
            token_ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            desktop_user_agent: default_desktop_user_agent(),
            mobile_user_agent: default_mobile_user_agent(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl UpstreamSettings {
    /// Point every endpoint at `base` (used for local mirrors and test servers)
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            landing_url: format!("{}/tv/p.php", base),
            playlist_url: format!("{}/pv/playlist.php", base),
            netflix_home_url: format!("{}/mobile/home?app=1", base),
            prime_home_url: format!("{}/mobile/pv/home?app=1", base),
            netflix_post_url: format!("{}/post.php", base),
            prime_post_url: format!("{}/pv/post.php", base),
            episodes_url: format!("{}/episodes.php", base),
            referer: format!("{}/", base),
            ..Self::default()
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        if let Ok(host) = std::env::var("NET51_SERVER_HOST") {
            settings.server.host = host;
        }

        if let Ok(port) = std::env::var("NET51_SERVER_PORT") {
            settings.server.port = port
                .parse()
                .map_err(|e| crate::Error::config("port", &format!("Invalid port: {}", e)))?;
        }

        if let Ok(ttl) = std::env::var("CREDENTIAL_TTL_SECS") {
            settings.cache.credential_ttl_secs = ttl.parse().map_err(|e| {
                crate::Error::config("CREDENTIAL_TTL_SECS", &format!("Invalid TTL: {}", e))
            })?;
        }

        if let Ok(ttl) = std::env::var("TOKEN_TTL_SECS") {
            settings.cache.token_ttl_secs = ttl.parse().map_err(|e| {
                crate::Error::config("TOKEN_TTL_SECS", &format!("Invalid TTL: {}", e))
            })?;
        }

        if let Ok(data_dir) = std::env::var("NET51_DATA_DIR") {
            settings.storage.data_dir = PathBuf::from(data_dir);
        }

        settings.network.https_proxy = std::env::var("HTTPS_PROXY").ok();
        settings.network.http_proxy = std::env::var("HTTP_PROXY").ok();
        settings.network.all_proxy = std::env::var("ALL_PROXY").ok();

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            settings.logging.level = level;
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            settings.logging.verbose = verbose.parse().unwrap_or(false);
        }

        Ok(settings)
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Merge settings with environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let env_settings = Self::from_env()?;
        let defaults = Self::default();

        // Merge only non-default values from environment
        if env_settings.server.host != defaults.server.host {
            self.server.host = env_settings.server.host;
        }
        if env_settings.server.port != defaults.server.port {
            self.server.port = env_settings.server.port;
        }
        if env_settings.cache.credential_ttl_secs != defaults.cache.credential_ttl_secs {
            self.cache.credential_ttl_secs = env_settings.cache.credential_ttl_secs;
        }
        if env_settings.cache.token_ttl_secs != defaults.cache.token_ttl_secs {
            self.cache.token_ttl_secs = env_settings.cache.token_ttl_secs;
        }
        if env_settings.storage.data_dir != defaults.storage.data_dir {
            self.storage.data_dir = env_settings.storage.data_dir;
        }
        if env_settings.logging.level != defaults.logging.level {
            self.logging.level = env_settings.logging.level;
        }
        if env_settings.logging.verbose {
            self.logging.verbose = true;
        }

        // Proxy settings always override if present
        if env_settings.network.https_proxy.is_some() {
            self.network.https_proxy = env_settings.network.https_proxy;
        }
        if env_settings.network.http_proxy.is_some() {
            self.network.http_proxy = env_settings.network.http_proxy;
        }
        if env_settings.network.all_proxy.is_some() {
            self.network.all_proxy = env_settings.network.all_proxy;
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::config(
                "port",
                "Invalid server port: cannot be 0",
            ));
        }

        if self.cache.credential_ttl_secs == 0 {
            return Err(crate::Error::config(
                "credential_ttl_secs",
                "Invalid credential TTL: cannot be 0",
            ));
        }

        if self.cache.token_ttl_secs == 0 {
            return Err(crate::Error::config(
                "token_ttl_secs",
                "Invalid token TTL: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        for (name, endpoint) in [
            ("landing_url", &self.upstream.landing_url),
            ("playlist_url", &self.upstream.playlist_url),
            ("netflix_home_url", &self.upstream.netflix_home_url),
            ("prime_home_url", &self.upstream.prime_home_url),
            ("netflix_post_url", &self.upstream.netflix_post_url),
            ("prime_post_url", &self.upstream.prime_post_url),
            ("episodes_url", &self.upstream.episodes_url),
            ("netflix_poster_cdn", &self.upstream.netflix_poster_cdn),
            ("prime_poster_cdn", &self.upstream.prime_poster_cdn),
        ] {
            if let Err(e) = url::Url::parse(endpoint) {
                return Err(crate::Error::config(
                    name,
                    &format!("Invalid URL '{}': {}", endpoint, e),
                ));
            }
        }

        for (name, proxy_url) in [
            ("https_proxy", &self.network.https_proxy),
            ("http_proxy", &self.network.http_proxy),
            ("all_proxy", &self.network.all_proxy),
        ] {
            if let Some(url_str) = proxy_url
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(
                    name,
                    &format!("Invalid proxy URL '{}': {}", url_str, e),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Static mutex to ensure environment variable tests don't interfere with each other
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "::");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cache.credential_ttl_secs, 3600);
        assert_eq!(settings.cache.token_ttl_secs, 3600);
        assert_eq!(settings.upstream.landing_url, "https://net51.cc/tv/p.php");
        assert_eq!(
            settings.upstream.netflix_poster_cdn,
            "https://imgcdn.kim/poster/v"
        );
        assert_eq!(
            settings.storage.data_dir,
            PathBuf::from("server").join("data")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[cache]
credential_ttl_secs = 600

[storage]
data_dir = "/var/lib/net51"
        "#
        )
        .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.cache.credential_ttl_secs, 600);
        // Untouched fields keep their defaults
        assert_eq!(settings.cache.token_ttl_secs, 3600);
        assert_eq!(settings.storage.data_dir, PathBuf::from("/var/lib/net51"));
    }

    #[test]
    fn test_env_var_override() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("CREDENTIAL_TTL_SECS", "120");
            std::env::set_var("NET51_SERVER_PORT", "9000");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.cache.credential_ttl_secs, 120);
        assert_eq!(settings.server.port, 9000);

        unsafe {
            std::env::remove_var("CREDENTIAL_TTL_SECS");
            std::env::remove_var("NET51_SERVER_PORT");
        }
    }

    #[test]
    fn test_proxy_priority() {
        let mut settings = Settings::default();
        settings.network.https_proxy = Some("https://proxy1:8080".to_string());
        settings.network.http_proxy = Some("http://proxy2:8080".to_string());
        settings.network.all_proxy = Some("socks5://proxy3:1080".to_string());

        assert_eq!(settings.get_proxy_url().unwrap(), "https://proxy1:8080");

        settings.network.https_proxy = None;
        assert_eq!(settings.get_proxy_url().unwrap(), "http://proxy2:8080");

        settings.network.http_proxy = None;
        assert_eq!(settings.get_proxy_url().unwrap(), "socks5://proxy3:1080");
    }

    #[test]
    fn test_with_base_url() {
        let upstream = UpstreamSettings::with_base_url("http://127.0.0.1:3000/");
        assert_eq!(upstream.landing_url, "http://127.0.0.1:3000/tv/p.php");
        assert_eq!(
            upstream.netflix_home_url,
            "http://127.0.0.1:3000/mobile/home?app=1"
        );
        // CDN prefixes are not rebased; they appear verbatim inside scraped HTML
        assert_eq!(upstream.prime_poster_cdn, "https://imgcdn.kim/pv/v");
    }

    #[test]
    fn test_validation_success() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_port() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let mut settings = Settings::default();
        settings.cache.token_ttl_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_upstream_url() {
        let mut settings = Settings::default();
        settings.upstream.playlist_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_proxy_url() {
        let mut settings = Settings::default();
        settings.network.https_proxy = Some("invalid-url".to_string());
        assert!(settings.validate().is_err());
    }
}
