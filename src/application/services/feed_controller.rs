//! Paginated photo feed state.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::application::ui_context::UiHandle;
use crate::domain::entities::{PhotoId, PhotoInfo, safe_photos};
use crate::domain::errors::FeedError;
use crate::domain::ports::PhotoFeedPort;

/// Fraction of the loaded feed the viewport must reach before the next page
/// is requested.
pub const DEFAULT_PREFETCH_THRESHOLD: f64 = 0.8;

/// Result of a page request, posted back to the UI loop.
#[derive(Debug)]
pub struct PageCompletion {
    generation: u64,
    page: u32,
    result: Result<Vec<PhotoInfo>, FeedError>,
}

impl PageCompletion {
    /// Page number the request was issued for.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

/// Change the presentation layer has to apply after a feed mutation.
#[derive(Debug, Clone)]
pub enum FeedChange {
    /// Items at these indices were appended.
    Inserted(Range<usize>),
    /// All items were discarded.
    Reset,
    /// The page request failed; nothing changed.
    Failed(FeedError),
}

/// Owns the ordered photo list, the page cursor and the single-flight flag.
///
/// All methods must be called from the UI loop. Network work runs in spawned
/// tasks whose completions come back as [`PageCompletion`]s and are applied by
/// [`handle_completion`](Self::handle_completion).
pub struct PhotoFeedController {
    feed: Arc<dyn PhotoFeedPort>,
    ui: UiHandle,
    photos: Vec<PhotoInfo>,
    known_ids: HashSet<PhotoId>,
    current_page: u32,
    fetch_in_flight: bool,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    prefetch_threshold: f64,
}

impl std::fmt::Debug for PhotoFeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoFeedController")
            .field("photos", &self.photos.len())
            .field("current_page", &self.current_page)
            .field("fetch_in_flight", &self.fetch_in_flight)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl PhotoFeedController {
    /// Creates a controller with an empty feed positioned at page 1.
    #[must_use]
    pub fn new(feed: Arc<dyn PhotoFeedPort>, ui: UiHandle) -> Self {
        Self {
            feed,
            ui,
            photos: Vec::new(),
            known_ids: HashSet::new(),
            current_page: 1,
            fetch_in_flight: false,
            generation: 0,
            in_flight: None,
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
        }
    }

    /// Sets the prefetch threshold, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_prefetch_threshold(mut self, threshold: f64) -> Self {
        self.prefetch_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn photos(&self) -> &[PhotoInfo] {
        &self.photos
    }

    #[must_use]
    pub fn photo(&self, index: usize) -> Option<&PhotoInfo> {
        self.photos.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Next page to be requested.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.fetch_in_flight
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Requests the page at the cursor unless one is already in flight.
    ///
    /// Returns `true` if a request was issued.
    pub fn request_next_page(&mut self) -> bool {
        if self.fetch_in_flight {
            trace!(page = self.current_page, "Page request already in flight");
            return false;
        }

        self.fetch_in_flight = true;

        let generation = self.generation;
        let page = self.current_page;
        let feed = Arc::clone(&self.feed);
        let ui = self.ui.clone();

        debug!(page, generation, "Requesting feed page");

        self.in_flight = Some(tokio::spawn(async move {
            let result = feed.fetch_page(page).await.map(safe_photos);
            ui.post(PageCompletion {
                generation,
                page,
                result,
            });
        }));

        true
    }

    /// Applies a page completion.
    ///
    /// Returns `None` for completions issued before the last [`reset`](Self::reset).
    pub fn handle_completion(&mut self, completion: PageCompletion) -> Option<FeedChange> {
        if completion.generation != self.generation {
            debug!(
                page = completion.page,
                stale_generation = completion.generation,
                generation = self.generation,
                "Discarding page from before reset"
            );
            return None;
        }

        self.in_flight = None;

        let change = match completion.result {
            Ok(photos) => {
                let start = self.photos.len();
                for photo in photos {
                    if self.known_ids.insert(photo.id()) {
                        self.photos.push(photo);
                    } else {
                        trace!(id = %photo.id(), "Skipping duplicate photo");
                    }
                }
                let end = self.photos.len();
                self.current_page += 1;

                info!(
                    page = completion.page,
                    added = end - start,
                    total = end,
                    "Feed page loaded"
                );
                FeedChange::Inserted(start..end)
            }
            Err(e) => {
                if e.is_benign() {
                    debug!(page = completion.page, "Feed page request cancelled");
                } else {
                    warn!(page = completion.page, error = %e, "Failed to load feed page");
                }
                FeedChange::Failed(e)
            }
        };

        self.fetch_in_flight = false;
        Some(change)
    }

    /// Discards the feed and starts over from page 1.
    ///
    /// Any in-flight request is aborted and its completion, if already
    /// posted, will be ignored. Exactly one new page request is issued.
    pub fn reset(&mut self) -> FeedChange {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!(generation = self.generation, "Aborted in-flight page request");
        }

        self.generation = self.generation.wrapping_add(1);
        self.photos.clear();
        self.known_ids.clear();
        self.current_page = 1;
        self.fetch_in_flight = false;

        info!(generation = self.generation, "Feed reset");

        self.request_next_page();
        FeedChange::Reset
    }

    /// Returns whether a viewport ending at `visible_end` (exclusive index) is
    /// close enough to the end of the feed to load more.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn should_prefetch(&self, visible_end: usize) -> bool {
        visible_end as f64 >= self.photos.len() as f64 * self.prefetch_threshold
    }

    /// Pagination trigger for scroll/selection updates.
    ///
    /// Returns `true` if a request was issued.
    pub fn on_viewport_changed(&mut self, visible_end: usize) -> bool {
        self.should_prefetch(visible_end) && self.request_next_page()
    }
}

impl Drop for PhotoFeedController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
