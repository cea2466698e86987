//! Application layer: feed state, image loading and the UI completion channel.

/// Stateful services owned by the UI loop.
pub mod services;
/// Completion channel back to the UI loop.
pub mod ui_context;
/// Use case implementations.
pub mod use_cases;

pub use services::{
    FeedChange, ImageLoadedEvent, ImageLoader, ImageRequest, ImageTarget, PhotoFeedController,
};
pub use ui_context::{UiEvent, UiHandle, UiReceiver, ui_channel};
pub use use_cases::{CommentsLoaded, LoadCommentsUseCase};
