//! Completion channel back to the UI loop.
//!
//! Background tasks never touch feed or view state directly. They post a
//! [`UiEvent`] through a [`UiHandle`]; the single UI loop drains the
//! receiver and applies each event in arrival order.

use tokio::sync::mpsc;
use tracing::debug;

use super::services::{ImageLoadedEvent, PageCompletion};
use super::use_cases::CommentsLoaded;

/// Work completed off the UI context, waiting to be applied on it.
#[derive(Debug)]
pub enum UiEvent {
    /// A feed page request finished.
    Page(PageCompletion),
    /// An image finished loading.
    Image(ImageLoadedEvent),
    /// A comment thread finished loading.
    Comments(CommentsLoaded),
}

impl From<PageCompletion> for UiEvent {
    fn from(value: PageCompletion) -> Self {
        Self::Page(value)
    }
}

impl From<ImageLoadedEvent> for UiEvent {
    fn from(value: ImageLoadedEvent) -> Self {
        Self::Image(value)
    }
}

impl From<CommentsLoaded> for UiEvent {
    fn from(value: CommentsLoaded) -> Self {
        Self::Comments(value)
    }
}

/// Cloneable handle used by background tasks to post completions.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiHandle {
    /// Posts an event to the UI loop. Dropped silently once the loop is gone.
    pub fn post(&self, event: impl Into<UiEvent>) {
        if self.tx.send(event.into()).is_err() {
            debug!("UI loop closed, dropping completion");
        }
    }
}

/// Receiving side, owned by the UI loop.
pub type UiReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Creates a connected handle/receiver pair.
#[must_use]
pub fn ui_channel() -> (UiHandle, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiHandle { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PhotoId;
    use tokio_test::{assert_pending, assert_ready, task};

    fn comments(id: u64) -> CommentsLoaded {
        CommentsLoaded {
            photo_id: PhotoId(id),
            result: Ok(Vec::new()),
        }
    }

    #[test]
    fn test_post_wakes_waiting_loop() {
        let (ui, mut rx) = ui_channel();
        let mut recv = task::spawn(rx.recv());
        assert_pending!(recv.poll());

        ui.post(comments(1));

        assert!(recv.is_woken());
        let event = assert_ready!(recv.poll());
        assert!(matches!(event, Some(UiEvent::Comments(c)) if c.photo_id == PhotoId(1)));
    }

    #[test]
    fn test_events_arrive_in_post_order() {
        let (ui, mut rx) = ui_channel();
        ui.post(comments(1));
        ui.clone().post(comments(2));

        let ids: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|event| match event {
                UiEvent::Comments(c) => Some(c.photo_id.as_u64()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_post_after_loop_closed_is_dropped() {
        let (ui, rx) = ui_channel();
        drop(rx);
        ui.post(comments(1));
    }
}
