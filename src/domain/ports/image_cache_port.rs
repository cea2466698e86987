//! Port definition for image caching.

use std::sync::Arc;

use crate::domain::entities::ImageKey;

/// Port for decoded-image caching.
///
/// Implementations must be thread-safe: many loads insert and look up
/// concurrently. Entries may disappear at any time, so a miss is always
/// a valid answer.
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    /// Returns None if not cached.
    fn get(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image in the cache.
    fn put(&self, key: ImageKey, image: Arc<image::DynamicImage>);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
