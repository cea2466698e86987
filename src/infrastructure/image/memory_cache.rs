//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::ImageKey;
use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 200;

/// Default upper bound on decoded pixel bytes held by the cache.
pub const DEFAULT_MAX_BYTES: usize = 128 * 1024 * 1024;

struct Inner {
    entries: LruCache<ImageKey, Arc<image::DynamicImage>>,
    bytes: usize,
}

/// In-memory LRU cache for decoded images, bounded by entry count and by
/// total decoded size. Least recently used entries are evicted first.
pub struct MemoryImageCache {
    inner: Mutex<Inner>,
    max_bytes: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

fn image_cost(image: &image::DynamicImage) -> usize {
    image.as_bytes().len()
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity and the default byte budget.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_limits(capacity, DEFAULT_MAX_BYTES)
    }

    /// Creates a new cache bounded by `capacity` entries and `max_bytes` of
    /// decoded pixel data.
    #[must_use]
    pub fn with_limits(capacity: usize, max_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(cap),
                bytes: 0,
            }),
            max_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default limits.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let inner = self.inner.lock();
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: inner.entries.len(),
            bytes: inner.bytes,
        }
    }

    /// Total decoded bytes currently held.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.inner.lock().bytes
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Decoded bytes held.
    pub bytes: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images ({} KiB), {:.1}% hit rate ({} hits, {} misses)",
            self.size,
            self.bytes / 1024,
            self.hit_rate,
            self.hits,
            self.misses
        )
    }
}

impl ImageCachePort for MemoryImageCache {
    fn get(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        let mut inner = self.inner.lock();
        if let Some(img) = inner.entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn put(&self, key: ImageKey, image: Arc<image::DynamicImage>) {
        let cost = image_cost(&image);
        if cost > self.max_bytes {
            debug!(key = %key, cost, "Image larger than cache budget, not caching");
            return;
        }

        let mut inner = self.inner.lock();
        debug!(key = %key, cost, "Storing image in memory cache");
        inner.bytes += cost;
        if let Some((_, displaced)) = inner.entries.push(key, image) {
            inner.bytes -= image_cost(&displaced);
        }
        while inner.bytes > self.max_bytes {
            let Some((evicted, img)) = inner.entries.pop_lru() else {
                break;
            };
            inner.bytes -= image_cost(&img);
            trace!(key = %evicted, "Evicted image to stay within byte budget");
        }
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
