//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Photo feed API client.
pub mod five_hundred_px;
/// Image caching and downloading.
pub mod image;

pub use config::{AppConfig, CliArgs, LogLevel, ConfigStore};
pub use five_hundred_px::{FiveHundredPxClient, FiveHundredPxConfig};
pub use self::image::{CacheStats, HttpImageFetcher, MemoryImageCache};

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("photomania/", env!("CARGO_PKG_VERSION"));
