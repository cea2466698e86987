pub mod feed_controller;
pub mod image_loader;
pub mod slot_tokens;

pub use feed_controller::{FeedChange, PageCompletion, PhotoFeedController};
pub use image_loader::{ImageLoadedEvent, ImageLoader, ImageRequest, ImageTarget};
pub use slot_tokens::SlotTokens;
