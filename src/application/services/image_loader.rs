//! Image fetch-and-cache orchestration for display slots.
//!
//! Lookups go to the memory cache first; misses are downloaded, validated
//! as `image/*`, decoded on the blocking pool and cached under the resolved
//! request URL. Results reach the UI loop as [`ImageLoadedEvent`]s, which are
//! applied only if the slot still expects them.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::slot_tokens::SlotTokens;
use crate::application::ui_context::UiHandle;
use crate::domain::entities::{
    ImageKey, ImageSource, LoadedImage, RequestToken, SlotId, is_image_content_type,
};
use crate::domain::errors::FeedError;
use crate::domain::ports::{ImageCachePort, ImageFetchPort};

/// Which view a loader serves. Carried on events so the UI loop can route them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// Photo grid thumbnails.
    Grid,
    /// Comment author avatars.
    Avatar,
}

/// Message sent when an image finishes loading.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// View the request was made for.
    pub target: ImageTarget,
    /// Slot the request was made for.
    pub slot: SlotId,
    /// Token the slot was bound to when the request was made.
    pub token: RequestToken,
    /// URL as requested.
    pub url: String,
    /// The loaded image.
    pub image: LoadedImage,
}

/// Outcome of binding a slot to an image.
#[derive(Debug, Clone)]
pub enum ImageRequest {
    /// Cache hit; no request was made.
    Ready(LoadedImage),
    /// A load was started; its event will carry this token.
    Pending(RequestToken),
}

/// Per-view image loader. Owned by the UI loop.
pub struct ImageLoader {
    target: ImageTarget,
    cache: Arc<dyn ImageCachePort>,
    fetcher: Arc<dyn ImageFetchPort>,
    ui: UiHandle,
    tokens: SlotTokens,
    pending: HashMap<SlotId, JoinHandle<()>>,
    untracked: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("target", &self.target)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    #[must_use]
    pub fn new(
        target: ImageTarget,
        cache: Arc<dyn ImageCachePort>,
        fetcher: Arc<dyn ImageFetchPort>,
        ui: UiHandle,
    ) -> Self {
        Self {
            target,
            cache,
            fetcher,
            ui,
            tokens: SlotTokens::new(),
            pending: HashMap::new(),
            untracked: Vec::new(),
        }
    }

    #[must_use]
    pub const fn target(&self) -> ImageTarget {
        self.target
    }

    /// Synchronous cache lookup by exact URL.
    #[must_use]
    pub fn cached(&self, url: &str) -> Option<LoadedImage> {
        let key = ImageKey::new(url);
        self.cache.get(&key).map(|image| LoadedImage {
            key,
            image,
            source: ImageSource::MemoryCache,
        })
    }

    /// Loads an image without slot bookkeeping.
    ///
    /// # Errors
    /// Returns error if the download, content-type validation or decode fails.
    pub async fn fetch_image(&self, url: &str) -> Result<LoadedImage, FeedError> {
        load_image(self.cache.as_ref(), self.fetcher.as_ref(), url).await
    }

    /// Binds `slot` to `url`, cancelling the slot's previous pending load.
    pub fn request(&mut self, slot: SlotId, url: &str) -> ImageRequest {
        if let Some(handle) = self.pending.remove(&slot) {
            handle.abort();
            trace!(%slot, "Cancelled superseded image load");
        }
        self.start(slot, url, true)
    }

    /// Binds `slot` to `url` without cancelling any earlier load.
    /// A superseded load still completes but fails [`accept`](Self::accept).
    /// [`cancel_all`](Self::cancel_all) and dropping the loader abort it.
    pub fn request_untracked(&mut self, slot: SlotId, url: &str) -> ImageRequest {
        self.start(slot, url, false)
    }

    fn start(&mut self, slot: SlotId, url: &str, track: bool) -> ImageRequest {
        self.pending.retain(|_, handle| !handle.is_finished());
        self.untracked.retain(|handle| !handle.is_finished());

        let token = self.tokens.bind(slot);

        if let Some(image) = self.cached(url) {
            trace!(%slot, url, "Image served from cache");
            return ImageRequest::Ready(image);
        }

        let target = self.target;
        let cache = Arc::clone(&self.cache);
        let fetcher = Arc::clone(&self.fetcher);
        let ui = self.ui.clone();
        let url = url.to_string();

        debug!(%slot, url = %url, "Loading image");

        let handle = tokio::spawn(async move {
            match load_image(cache.as_ref(), fetcher.as_ref(), &url).await {
                Ok(image) => ui.post(ImageLoadedEvent {
                    target,
                    slot,
                    token,
                    url,
                    image,
                }),
                Err(e) if e.is_benign() => debug!(url = %url, "Image load cancelled"),
                Err(e) => warn!(url = %url, error = %e, "Image load failed"),
            }
        });

        if track {
            self.pending.insert(slot, handle);
        } else {
            self.untracked.push(handle);
        }

        ImageRequest::Pending(token)
    }

    /// Returns whether `event` is still wanted by its slot.
    pub fn accept(&mut self, event: &ImageLoadedEvent) -> bool {
        if event.target != self.target || !self.tokens.is_current(event.slot, event.token) {
            debug!(slot = %event.slot, url = %event.url, "Dropping stale image");
            return false;
        }
        self.pending.remove(&event.slot);
        true
    }

    /// Cancels the slot's pending load and stops expecting anything for it.
    pub fn cancel(&mut self, slot: SlotId) {
        if let Some(handle) = self.pending.remove(&slot) {
            handle.abort();
        }
        self.tokens.invalidate(slot);
    }

    /// Cancels every pending load, tracked or not, and unbinds all slots.
    pub fn cancel_all(&mut self) {
        let count = self.abort_running();
        self.tokens.clear();
        if count > 0 {
            debug!(count, view = ?self.target, "Cancelled all pending image loads");
        }
    }

    fn abort_running(&mut self) -> usize {
        let handles: Vec<_> = self
            .pending
            .drain()
            .map(|(_, handle)| handle)
            .chain(self.untracked.drain(..))
            .filter(|handle| !handle.is_finished())
            .collect();
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        self.abort_running();
    }
}

async fn load_image(
    cache: &dyn ImageCachePort,
    fetcher: &dyn ImageFetchPort,
    url: &str,
) -> Result<LoadedImage, FeedError> {
    let key = ImageKey::new(url);
    if let Some(image) = cache.get(&key) {
        return Ok(LoadedImage {
            key,
            image,
            source: ImageSource::MemoryCache,
        });
    }

    let fetched = fetcher.fetch(url).await?;

    if !fetched
        .content_type
        .as_deref()
        .is_some_and(is_image_content_type)
    {
        return Err(FeedError::InvalidContentType {
            content_type: fetched.content_type,
        });
    }

    let bytes = fetched.bytes;
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                FeedError::Cancelled
            } else {
                FeedError::decode(format!("decode task panicked: {e}"))
            }
        })?
        .map_err(|e| FeedError::decode(e.to_string()))?;

    let image = Arc::new(decoded);
    let key = ImageKey::new(fetched.resolved_url);
    cache.put(key.clone(), Arc::clone(&image));

    Ok(LoadedImage {
        key,
        image,
        source: ImageSource::Network,
    })
}
