//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{Comment, ImageKey, LoadedImage, PhotoId, PhotoInfo, SlotId};
pub use errors::FeedError;
pub use ports::{ImageCachePort, ImageFetchPort, PhotoFeedPort};
