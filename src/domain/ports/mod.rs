mod image_cache_port;
mod image_fetch_port;
mod photo_feed_port;

pub use image_cache_port::ImageCachePort;
pub use image_fetch_port::{FetchedImage, ImageFetchPort};
pub use photo_feed_port::PhotoFeedPort;

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetch_port::{HeldImageFetcher, MockImageFetchPort};
    pub use super::photo_feed_port::MockPhotoFeedPort;
}
