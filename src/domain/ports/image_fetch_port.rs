//! Port for downloading raw image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FeedError;

/// Raw image response, before validation and decoding.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Final URL after redirects.
    pub resolved_url: String,
    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub bytes: Bytes,
}

/// Port for fetching images over the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the resource at `url`.
    /// Non-2xx responses are reported as [`FeedError::Status`].
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FeedError>;
}

#[cfg(test)]
pub use held::HeldImageFetcher;

#[cfg(test)]
mod held {
    use std::collections::{HashMap, HashSet};
    use std::io::Cursor;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::watch;

    use super::{FetchedImage, ImageFetchPort};
    use crate::domain::errors::FeedError;

    /// Serves generated PNGs. Fetches of held URLs block until [`release`](Self::release).
    #[derive(Debug)]
    pub struct HeldImageFetcher {
        held: HashSet<String>,
        sizes: HashMap<String, (u32, u32)>,
        gate: watch::Sender<bool>,
    }

    impl HeldImageFetcher {
        pub fn new() -> Self {
            let (gate, _) = watch::channel(false);
            Self {
                held: HashSet::new(),
                sizes: HashMap::new(),
                gate,
            }
        }

        pub fn hold(mut self, url: &str) -> Self {
            self.held.insert(url.to_string());
            self
        }

        /// Serves `url` as a `width`×`height` image instead of 2×2.
        pub fn sized(mut self, url: &str, width: u32, height: u32) -> Self {
            self.sizes.insert(url.to_string(), (width, height));
            self
        }

        pub fn release(&self) {
            self.gate.send_replace(true);
        }
    }

    #[async_trait]
    impl ImageFetchPort for HeldImageFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedImage, FeedError> {
            if self.held.contains(url) {
                let mut open = self.gate.subscribe();
                if open.wait_for(|open| *open).await.is_err() {
                    return Err(FeedError::Cancelled);
                }
            }

            let (width, height) = self.sizes.get(url).copied().unwrap_or((2, 2));
            let mut buf = Cursor::new(Vec::new());
            image::DynamicImage::new_rgb8(width, height)
                .write_to(&mut buf, image::ImageFormat::Png)
                .map_err(|e| FeedError::decode(e.to_string()))?;

            Ok(FetchedImage {
                resolved_url: url.to_string(),
                content_type: Some("image/png".to_string()),
                bytes: Bytes::from(buf.into_inner()),
            })
        }
    }
}
