//! Port for the remote photo feed service.

use async_trait::async_trait;

use crate::domain::entities::{Comment, PhotoId, PhotoRecord};
use crate::domain::errors::FeedError;

/// Port for fetching feed pages and comment threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoFeedPort: Send + Sync {
    /// Fetches one page (1-based) of the popular photos feed.
    /// Records are returned unfiltered, in service order.
    async fn fetch_page(&self, page: u32) -> Result<Vec<PhotoRecord>, FeedError>;

    /// Fetches one page of a photo's comment thread.
    async fn fetch_comments(&self, photo_id: PhotoId, page: u32)
    -> Result<Vec<Comment>, FeedError>;
}
