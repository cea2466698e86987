//! Photomania - a terminal browser for paginated photo feeds.
//!
//! This crate pages through a popular-photos feed, hides NSFW entries,
//! loads thumbnails through a bounded in-memory cache and shows comment
//! threads, all driven from a single UI loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the feed controller, image loading and use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "photomania";
