//! Use case implementations.

mod load_comments_use_case;

pub use load_comments_use_case::{CommentsLoaded, LoadCommentsUseCase};
