//! Photo grid widget.

use std::collections::HashMap;
use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{ImageSource, LoadedImage, PhotoId, PhotoInfo};

/// Tiles per grid row.
pub const GRID_COLUMNS: usize = 3;
/// Terminal rows per tile.
pub const TILE_HEIGHT: u16 = 4;

/// Thumbnail state of one photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumbnail {
    /// Waiting for the image.
    Loading,
    /// Decoded and available.
    Ready {
        width: u32,
        height: u32,
        source: ImageSource,
    },
}

impl From<&LoadedImage> for Thumbnail {
    fn from(image: &LoadedImage) -> Self {
        let (width, height) = image.dimensions();
        Self::Ready {
            width,
            height,
            source: image.source,
        }
    }
}

/// Selection, scroll position and thumbnail states of the grid.
#[derive(Debug, Default)]
pub struct PhotoGridState {
    selected: usize,
    first_row: usize,
    visible_rows: usize,
    thumbnails: HashMap<PhotoId, Thumbnail>,
}

impl PhotoGridState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible_rows: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the selection by `delta` tiles, clamped to the feed.
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(max);
        self.scroll_to_selected();
    }

    /// Moves the selection by whole rows.
    #[allow(clippy::cast_possible_wrap)]
    pub fn move_rows(&mut self, rows: isize, len: usize) {
        self.move_by(rows * GRID_COLUMNS as isize, len);
    }

    /// Records how many tile rows fit on screen.
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        self.scroll_to_selected();
    }

    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    fn scroll_to_selected(&mut self) {
        let row = self.selected / GRID_COLUMNS;
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + self.visible_rows {
            self.first_row = row + 1 - self.visible_rows;
        }
    }

    /// Indices of the photos currently on screen.
    #[must_use]
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = (self.first_row * GRID_COLUMNS).min(len);
        let end = ((self.first_row + self.visible_rows) * GRID_COLUMNS).min(len);
        start..end
    }

    #[must_use]
    pub fn thumbnail(&self, id: PhotoId) -> Option<Thumbnail> {
        self.thumbnails.get(&id).copied()
    }

    pub fn set_thumbnail(&mut self, id: PhotoId, thumbnail: Thumbnail) {
        self.thumbnails.insert(id, thumbnail);
    }

    /// Marks the photo as loading unless it is already known.
    pub fn mark_loading(&mut self, id: PhotoId) {
        self.thumbnails.entry(id).or_insert(Thumbnail::Loading);
    }

    /// Forgets all items; used when the feed is reset.
    pub fn clear(&mut self) {
        self.selected = 0;
        self.first_row = 0;
        self.thumbnails.clear();
    }
}

/// Grid of photo tiles with a loading footer.
pub struct PhotoGrid<'a> {
    photos: &'a [PhotoInfo],
    loading: bool,
}

impl<'a> PhotoGrid<'a> {
    #[must_use]
    pub const fn new(photos: &'a [PhotoInfo], loading: bool) -> Self {
        Self { photos, loading }
    }

    fn render_tile(
        photo: &PhotoInfo,
        thumbnail: Option<Thumbnail>,
        selected: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let border_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" #{} ", photo.id()));

        let status = match thumbnail {
            Some(Thumbnail::Ready {
                width,
                height,
                source,
            }) => Line::styled(
                format!("{width}×{height} ({source})"),
                Style::default().fg(Color::Green),
            ),
            Some(Thumbnail::Loading) | None => {
                Line::styled("loading…", Style::default().fg(Color::DarkGray))
            }
        };

        Paragraph::new(status).block(block).render(area, buf);
    }
}

impl StatefulWidget for PhotoGrid<'_> {
    type State = PhotoGridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [tiles_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        state.set_visible_rows((tiles_area.height / TILE_HEIGHT) as usize);

        let range = state.visible_range(self.photos.len());
        let row_constraints = vec![Constraint::Length(TILE_HEIGHT); state.visible_rows()];
        let rows = Layout::vertical(row_constraints).split(tiles_area);

        for (offset, index) in range.enumerate() {
            let row = offset / GRID_COLUMNS;
            let col = offset % GRID_COLUMNS;
            let Some(row_area) = rows.get(row) else {
                break;
            };
            let cols = Layout::horizontal([Constraint::Ratio(1, 3); GRID_COLUMNS]).split(*row_area);
            let photo = &self.photos[index];
            Self::render_tile(
                photo,
                state.thumbnail(photo.id()),
                index == state.selected(),
                cols[col],
                buf,
            );
        }

        let footer = if self.loading {
            Line::styled("  loading more photos…", Style::default().fg(Color::Cyan))
        } else if self.photos.is_empty() {
            Line::styled("  no photos yet, press r to refresh", Style::default().fg(Color::DarkGray))
        } else {
            Line::default()
        };
        Paragraph::new(footer).render(footer_area, buf);
    }
}
