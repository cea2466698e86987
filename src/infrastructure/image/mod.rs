//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction under count and byte limits
//! - HTTP image downloads

pub mod http_fetcher;
pub mod memory_cache;

pub use http_fetcher::HttpImageFetcher;
pub use memory_cache::{CacheStats, MemoryImageCache};
