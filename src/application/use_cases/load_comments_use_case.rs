//! Comment thread loading.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ui_context::UiHandle;
use crate::domain::entities::{Comment, PhotoId};
use crate::domain::errors::FeedError;
use crate::domain::ports::PhotoFeedPort;

/// A comment thread fetched in the background.
#[derive(Debug)]
pub struct CommentsLoaded {
    /// Photo the thread belongs to.
    pub photo_id: PhotoId,
    /// Comments, or the failure.
    pub result: Result<Vec<Comment>, FeedError>,
}

/// Fetches a photo's comment thread.
#[derive(Clone)]
pub struct LoadCommentsUseCase {
    feed: Arc<dyn PhotoFeedPort>,
}

impl LoadCommentsUseCase {
    /// Creates new comments use case.
    #[must_use]
    pub const fn new(feed: Arc<dyn PhotoFeedPort>) -> Self {
        Self { feed }
    }

    /// Fetches one page of comments for `photo_id`.
    ///
    /// # Errors
    /// Returns error if the request fails or the body cannot be parsed.
    pub async fn execute(&self, photo_id: PhotoId, page: u32) -> Result<Vec<Comment>, FeedError> {
        debug!(%photo_id, page, "Fetching comments");

        let comments = self
            .feed
            .fetch_comments(photo_id, page)
            .await
            .inspect_err(|e| warn!(%photo_id, error = %e, "Failed to load comments"))?;

        info!(%photo_id, count = comments.len(), "Comments loaded");
        Ok(comments)
    }

    /// Fetches the first page of comments in the background and posts the
    /// result to the UI loop.
    pub fn spawn(&self, photo_id: PhotoId, ui: UiHandle) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.execute(photo_id, 1).await;
            ui.post(CommentsLoaded { photo_id, result });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ui_context::{UiEvent, ui_channel};
    use crate::domain::ports::mocks::MockPhotoFeedPort;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_execute_returns_comments() {
        let mut feed = MockPhotoFeedPort::new();
        feed.expect_fetch_comments()
            .with(eq(PhotoId(7)), eq(1))
            .times(1)
            .returning(|_, _| Ok(vec![Comment::new("Ann Lee", "Lovely", "https://a/1.png")]));
        let use_case = LoadCommentsUseCase::new(Arc::new(feed));

        let comments = use_case.execute(PhotoId(7), 1).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user_fullname(), "Ann Lee");
    }

    #[tokio::test]
    async fn test_spawn_posts_failure() {
        let mut feed = MockPhotoFeedPort::new();
        feed.expect_fetch_comments()
            .returning(|_, _| Err(FeedError::network("offline")));
        let use_case = LoadCommentsUseCase::new(Arc::new(feed));
        let (ui, mut rx) = ui_channel();

        use_case.spawn(PhotoId(3), ui).await.unwrap();

        match rx.recv().await {
            Some(UiEvent::Comments(loaded)) => {
                assert_eq!(loaded.photo_id, PhotoId(3));
                assert!(matches!(loaded.result, Err(FeedError::Network { .. })));
            }
            other => panic!("expected comments event, got {other:?}"),
        }
    }
}
