//! Domain types for image handling.

use std::sync::Arc;

/// Cache key for a decoded image: the canonical request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a new `ImageKey` from a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the inner URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A reusable display unit (grid cell, comment row) that images are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Token identifying one binding of a slot to an image request.
/// Tokens for the same slot increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    MemoryCache,
    /// Downloaded from network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Key the image is cached under (the resolved request URL).
    pub key: ImageKey,
    /// The decoded image.
    pub image: Arc<image::DynamicImage>,
    /// Where the image came from.
    pub source: ImageSource,
}

impl LoadedImage {
    /// Image dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Returns whether a declared content type matches the `image/*` pattern.
#[must_use]
pub fn is_image_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}
