//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::services::feed_controller::DEFAULT_PREFETCH_THRESHOLD;
use crate::infrastructure::five_hundred_px::{DEFAULT_BASE_URL, FiveHundredPxConfig};
use crate::infrastructure::image::memory_cache::{DEFAULT_CACHE_SIZE, DEFAULT_MAX_BYTES};

pub(super) const APP_NAME: &str = "photomania";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "photomania";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from `config.toml` and overridden by CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Image cache limits.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Feed behaviour.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Consumer key. Usually supplied through `PHOTOMANIA_CONSUMER_KEY`.
    #[serde(default)]
    pub consumer_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            consumer_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Image cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of decoded images kept in memory.
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Maximum decoded bytes kept in memory.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// Feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Fraction of loaded photos the selection must pass to load the next page.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            prefetch_threshold: default_prefetch_threshold(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_images() -> usize {
    DEFAULT_CACHE_SIZE
}

const fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

const fn default_prefetch_threshold() -> f64 {
    DEFAULT_PREFETCH_THRESHOLD
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(base_url) = args.base_url {
            self.api.base_url = base_url;
        }
        if let Some(consumer_key) = args.consumer_key {
            self.api.consumer_key = consumer_key;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.api.timeout_secs = timeout_secs;
        }
        if let Some(max_images) = args.cache_max_images {
            self.cache.max_images = max_images;
        }
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Builds the feed client settings.
    #[must_use]
    pub fn feed_client_config(&self) -> FiveHundredPxConfig {
        FiveHundredPxConfig {
            base_url: self.api.base_url.clone(),
            consumer_key: self.api.consumer_key.clone(),
            timeout: self.timeout(),
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("photomania.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [api]
            consumer_key = "abc123"

            [cache]
            max_images = 10
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.consumer_key, "abc123");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache.max_images, 10);
        assert_eq!(config.cache.max_bytes, DEFAULT_MAX_BYTES);
        assert!((config.feed.prefetch_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.consumer_key.is_empty());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://file.example/v1"
            timeout_secs = 5
        "#,
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "photomania",
            "--base-url",
            "http://localhost:8080",
            "--log-level",
            "trace",
        ]);
        config.merge_with_args(args);

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.feed_client_config().timeout, Duration::from_secs(5));
    }
}
