//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Single-line status bar with left- and right-aligned content.
#[derive(Debug, Clone)]
pub struct StatusBar {
    left: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates empty status bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            level: StatusLevel::Info,
        }
    }

    /// Sets left content.
    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    /// Sets right content.
    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    /// Sets status level.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Summary of the feed: photo count, next page and fetch activity.
    #[must_use]
    pub fn feed(loaded: usize, next_page: u32, fetching: bool) -> Self {
        let activity = if fetching {
            format!("loading page {next_page}…")
        } else {
            format!("next page {next_page}")
        };
        Self::new()
            .left(format!(" {loaded} photos"))
            .right(format!("{activity} "))
    }

    /// Creates error status bar.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Error)
    }

    #[must_use]
    pub fn left_text(&self) -> &str {
        &self.left
    }

    #[must_use]
    pub fn right_text(&self) -> &str {
        &self.right
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);

        let width = area.width as usize;
        let left_len = self.left.chars().count();
        let right_len = self.right.chars().count();
        let padding = width.saturating_sub(left_len + right_len);

        let mut spans = vec![Span::styled(&self.left, style)];
        if padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
        }
        if !self.right.is_empty() {
            spans.push(Span::styled(&self.right, style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_status_text() {
        let bar = StatusBar::feed(12, 3, true);
        assert_eq!(bar.left_text(), " 12 photos");
        assert!(bar.right_text().contains("loading page 3"));

        let idle = StatusBar::feed(12, 3, false);
        assert!(idle.right_text().contains("next page 3"));
    }

    #[test]
    fn test_render_aligns_right_content() {
        let bar = StatusBar::new().left("L").right("R");
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);

        (&bar).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "L");
        assert_eq!(buf[(9, 0)].symbol(), "R");
    }
}
