//! Main application orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, trace};

use crate::application::{
    FeedChange, ImageLoadedEvent, ImageLoader, ImageRequest, ImageTarget, LoadCommentsUseCase,
    PhotoFeedController, UiEvent, UiHandle, UiReceiver, ui_channel,
};
use crate::application::use_cases::CommentsLoaded;
use crate::domain::entities::{PhotoId, SlotId};
use crate::domain::ports::{ImageCachePort, ImageFetchPort, PhotoFeedPort};
use crate::presentation::events::{EventHandler, KeyAction};
use crate::presentation::widgets::{
    CommentList, CommentThreadState, PhotoGrid, PhotoGridState, StatusBar, Thumbnail,
};

const SPINNER_TICK_RATE: Duration = Duration::from_millis(120);
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Comment thread opened over the grid.
struct CommentsView {
    state: CommentThreadState,
    task: JoinHandle<()>,
}

impl Drop for CommentsView {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct App {
    feed: PhotoFeedController,
    grid_images: ImageLoader,
    // Shared by every thread so avatar tokens are never handed out twice.
    avatar_images: ImageLoader,
    comments: LoadCommentsUseCase,
    ui: UiHandle,
    ui_rx: UiReceiver,
    grid: PhotoGridState,
    grid_slots: HashMap<SlotId, PhotoId>,
    thread: Option<CommentsView>,
    last_error: Option<String>,
    spinner: usize,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(
        feed_port: Arc<dyn PhotoFeedPort>,
        cache: Arc<dyn ImageCachePort>,
        fetcher: Arc<dyn ImageFetchPort>,
        prefetch_threshold: f64,
    ) -> Self {
        let (ui, ui_rx) = ui_channel();
        let feed = PhotoFeedController::new(Arc::clone(&feed_port), ui.clone())
            .with_prefetch_threshold(prefetch_threshold);
        let grid_images = ImageLoader::new(
            ImageTarget::Grid,
            Arc::clone(&cache),
            Arc::clone(&fetcher),
            ui.clone(),
        );
        let avatar_images = ImageLoader::new(ImageTarget::Avatar, cache, fetcher, ui.clone());

        Self {
            feed,
            grid_images,
            avatar_images,
            comments: LoadCommentsUseCase::new(feed_port),
            ui,
            ui_rx,
            grid: PhotoGridState::new(),
            grid_slots: HashMap::new(),
            thread: None,
            last_error: None,
            spinner: 0,
            should_quit: false,
        }
    }

    /// Runs the UI loop until the user quits.
    ///
    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        info!("Loading first feed page");
        self.feed.request_next_page();

        let mut terminal_events = EventStream::new();
        let mut spinner_interval = interval(SPINNER_TICK_RATE);

        self.draw(terminal)?;

        while !self.should_quit {
            tokio::select! {
                biased;

                Some(event) = self.ui_rx.recv() => {
                    self.handle_ui_event(event);
                    self.draw(terminal)?;
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if let Event::Key(key) = event {
                        self.handle_key(key);
                    }
                    self.draw(terminal)?;
                }

                _ = spinner_interval.tick() => {
                    if self.feed.is_fetching() {
                        self.spinner = self.spinner.wrapping_add(1);
                        self.draw(terminal)?;
                    }
                }
            }
        }

        info!("Exiting");
        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        // Rendering decides how many tiles fit, so slots are bound afterwards.
        if self.sync_grid_slots() {
            terminal.draw(|frame| self.render(frame))?;
        }
        Ok(())
    }

    fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Page(completion) => {
                if let Some(change) = self.feed.handle_completion(completion) {
                    self.apply_feed_change(change);
                }
            }
            UiEvent::Image(event) => self.apply_image(&event),
            UiEvent::Comments(loaded) => self.apply_comments(loaded),
        }
    }

    fn apply_feed_change(&mut self, change: FeedChange) {
        match change {
            FeedChange::Inserted(range) => {
                self.last_error = None;
                if !range.is_empty() {
                    self.check_prefetch();
                }
            }
            FeedChange::Reset => {
                self.grid_images.cancel_all();
                self.grid_slots.clear();
                self.grid.clear();
                self.last_error = None;
            }
            FeedChange::Failed(e) => {
                if !e.is_benign() {
                    self.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn apply_image(&mut self, event: &ImageLoadedEvent) {
        match event.target {
            ImageTarget::Grid => {
                if !self.grid_images.accept(event) {
                    return;
                }
                if let Some(id) = self.grid_slots.get(&event.slot) {
                    self.grid.set_thumbnail(*id, Thumbnail::from(&event.image));
                }
            }
            ImageTarget::Avatar => {
                let Some(thread) = self.thread.as_mut() else {
                    trace!(url = %event.url, "Avatar arrived after thread closed");
                    return;
                };
                if self.avatar_images.accept(event) {
                    thread
                        .state
                        .set_avatar(event.slot.0, Thumbnail::from(&event.image));
                }
            }
        }
    }

    fn apply_comments(&mut self, loaded: CommentsLoaded) {
        let Some(thread) = self.thread.as_mut() else {
            return;
        };
        if thread.state.photo_id() != loaded.photo_id {
            debug!(photo_id = %loaded.photo_id, "Ignoring comments for another photo");
            return;
        }

        match loaded.result {
            Ok(comments) => {
                let urls: Vec<String> = comments
                    .iter()
                    .map(|c| c.user_picture_url().to_string())
                    .collect();
                thread.state.set_comments(comments);

                for (row, url) in urls.iter().enumerate() {
                    if url.is_empty() {
                        continue;
                    }
                    match self.avatar_images.request_untracked(SlotId(row), url) {
                        ImageRequest::Ready(image) => {
                            thread.state.set_avatar(row, Thumbnail::from(&image));
                        }
                        ImageRequest::Pending(_) => {
                            thread.state.set_avatar(row, Thumbnail::Loading);
                        }
                    }
                }
            }
            Err(e) => thread.state.set_failed(e.to_string()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = EventHandler::action(&key);

        if self.thread.is_some() {
            match action {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Back => self.close_comments(),
                KeyAction::MoveRows(rows) => {
                    if let Some(thread) = self.thread.as_mut() {
                        thread.state.scroll_by(rows);
                    }
                }
                _ => {}
            }
            return;
        }

        let len = self.feed.len();
        match action {
            KeyAction::Quit | KeyAction::Back => self.should_quit = true,
            KeyAction::Open => self.open_comments(),
            KeyAction::Refresh => {
                let change = self.feed.reset();
                self.apply_feed_change(change);
            }
            KeyAction::Move(delta) => {
                self.grid.move_by(delta, len);
                self.check_prefetch();
            }
            KeyAction::MoveRows(rows) => {
                self.grid.move_rows(rows, len);
                self.check_prefetch();
            }
            KeyAction::Ignored => {}
        }
    }

    fn check_prefetch(&mut self) {
        let visible_end = self.grid.visible_range(self.feed.len()).end;
        if self.feed.on_viewport_changed(visible_end) {
            debug!(visible_end, "Prefetching next page");
        }
    }

    fn open_comments(&mut self) {
        let Some(photo) = self.feed.photo(self.grid.selected()) else {
            return;
        };
        let photo_id = photo.id();
        debug!(%photo_id, "Opening comments");

        self.avatar_images.cancel_all();
        let task = self.comments.spawn(photo_id, self.ui.clone());

        self.thread = Some(CommentsView {
            state: CommentThreadState::new(photo_id),
            task,
        });
    }

    fn close_comments(&mut self) {
        self.avatar_images.cancel_all();
        self.thread = None;
    }

    /// Binds on-screen tiles to their photos and releases tiles that
    /// scrolled away. Returns `true` if any thumbnail changed.
    fn sync_grid_slots(&mut self) -> bool {
        let range = self.grid.visible_range(self.feed.len());
        let visible = range.len();
        let mut changed = false;

        for (offset, index) in range.enumerate() {
            let Some(photo) = self.feed.photo(index) else {
                break;
            };
            let slot = SlotId(offset);
            let id = photo.id();
            if self.grid_slots.get(&slot) == Some(&id) {
                continue;
            }
            self.grid_slots.insert(slot, id);

            if matches!(self.grid.thumbnail(id), Some(Thumbnail::Ready { .. })) {
                self.grid_images.cancel(slot);
                continue;
            }

            match self.grid_images.request(slot, photo.url()) {
                ImageRequest::Ready(image) => {
                    self.grid.set_thumbnail(id, Thumbnail::from(&image));
                    changed = true;
                }
                ImageRequest::Pending(_) => self.grid.mark_loading(id),
            }
        }

        let stale: Vec<SlotId> = self
            .grid_slots
            .keys()
            .filter(|slot| slot.0 >= visible)
            .copied()
            .collect();
        for slot in stale {
            self.grid_slots.remove(&slot);
            self.grid_images.cancel(slot);
        }

        changed
    }

    fn status_bar(&self) -> StatusBar {
        if let Some(error) = &self.last_error {
            return StatusBar::error(format!(" {error} (move or press r to retry)"));
        }
        let bar = StatusBar::feed(
            self.feed.len(),
            self.feed.current_page(),
            self.feed.is_fetching(),
        );
        if self.feed.is_fetching() {
            let frame = SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()];
            let right = format!("{frame} {}", bar.right_text());
            bar.right(right)
        } else {
            bar
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [title_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Line::styled(
                " photomania · popular",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            title_area,
        );

        if let Some(thread) = self.thread.as_mut() {
            frame.render_stateful_widget(CommentList, body_area, &mut thread.state);
        } else {
            frame.render_stateful_widget(
                PhotoGrid::new(self.feed.photos(), self.feed.is_fetching()),
                body_area,
                &mut self.grid,
            );
        }

        let status = self.status_bar();
        frame.render_widget(&status, status_area);
    }
}
