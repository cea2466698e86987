//! Comment thread widget.

use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use super::photo_grid::Thumbnail;
use crate::domain::entities::{Comment, PhotoId};

/// Loading state of a comment thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ThreadState {
    /// Request in flight.
    #[default]
    Loading,
    /// Comments received.
    Loaded,
    /// Request failed.
    Failed(String),
}

/// Comments shown for one photo, with avatar states per row.
#[derive(Debug)]
pub struct CommentThreadState {
    photo_id: PhotoId,
    comments: Vec<Comment>,
    avatars: HashMap<usize, Thumbnail>,
    state: ThreadState,
    list: ListState,
}

impl CommentThreadState {
    #[must_use]
    pub fn new(photo_id: PhotoId) -> Self {
        Self {
            photo_id,
            comments: Vec::new(),
            avatars: HashMap::new(),
            state: ThreadState::Loading,
            list: ListState::default(),
        }
    }

    #[must_use]
    pub const fn photo_id(&self) -> PhotoId {
        self.photo_id
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub const fn state(&self) -> &ThreadState {
        &self.state
    }

    /// Replaces the thread with fetched comments.
    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.avatars.clear();
        self.list.select(if comments.is_empty() { None } else { Some(0) });
        self.comments = comments;
        self.state = ThreadState::Loaded;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.state = ThreadState::Failed(message.into());
    }

    #[must_use]
    pub fn avatar(&self, row: usize) -> Option<Thumbnail> {
        self.avatars.get(&row).copied()
    }

    pub fn set_avatar(&mut self, row: usize, thumbnail: Thumbnail) {
        self.avatars.insert(row, thumbnail);
    }

    /// Moves the highlighted row.
    pub fn scroll_by(&mut self, delta: isize) {
        if self.comments.is_empty() {
            return;
        }
        let current = self.list.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.comments.len() - 1);
        self.list.select(Some(next));
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.list.selected()
    }
}

/// Renders a [`CommentThreadState`].
pub struct CommentList;

impl CommentList {
    fn item(comment: &Comment, avatar: Option<Thumbnail>) -> ListItem<'static> {
        let avatar_marker = match avatar {
            Some(Thumbnail::Ready { .. }) => Span::styled("● ", Style::default().fg(Color::Green)),
            Some(Thumbnail::Loading) | None => {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        };

        let header = Line::from(vec![
            avatar_marker,
            Span::styled(
                comment.user_fullname().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        let body = Line::from(format!("  {}", comment.plain_body()));

        ListItem::new(vec![header, body, Line::default()])
    }
}

impl StatefulWidget for CommentList {
    type State = CommentThreadState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Comments on #{} ", state.photo_id));

        match &state.state {
            ThreadState::Loading => {
                Paragraph::new("loading comments…")
                    .block(block)
                    .render(area, buf);
            }
            ThreadState::Failed(message) => {
                Paragraph::new(Line::styled(
                    format!("failed to load comments: {message}"),
                    Style::default().fg(Color::Red),
                ))
                .wrap(Wrap { trim: true })
                .block(block)
                .render(area, buf);
            }
            ThreadState::Loaded if state.comments.is_empty() => {
                Paragraph::new("no comments").block(block).render(area, buf);
            }
            ThreadState::Loaded => {
                let items: Vec<ListItem> = state
                    .comments
                    .iter()
                    .enumerate()
                    .map(|(row, comment)| Self::item(comment, state.avatars.get(&row).copied()))
                    .collect();

                let list = List::new(items)
                    .block(block)
                    .highlight_style(Style::default().bg(Color::DarkGray));
                StatefulWidget::render(list, area, buf, &mut state.list);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ImageSource;

    fn comment(name: &str) -> Comment {
        Comment::new(name, "<b>nice</b> shot", "https://example.com/a.png")
    }

    #[test]
    fn test_set_comments_selects_first_row() {
        let mut state = CommentThreadState::new(PhotoId(7));
        assert_eq!(state.state(), &ThreadState::Loading);

        state.set_comments(vec![comment("a"), comment("b")]);

        assert_eq!(state.state(), &ThreadState::Loaded);
        assert_eq!(state.selected(), Some(0));
        state.scroll_by(5);
        assert_eq!(state.selected(), Some(1));
        state.scroll_by(-5);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_new_thread_forgets_avatars() {
        let mut state = CommentThreadState::new(PhotoId(7));
        state.set_avatar(
            0,
            Thumbnail::Ready {
                width: 2,
                height: 2,
                source: ImageSource::Network,
            },
        );
        state.set_comments(vec![comment("a")]);
        assert_eq!(state.avatar(0), None);
    }

    #[test]
    fn test_render_shows_author_and_plain_body() {
        let mut state = CommentThreadState::new(PhotoId(7));
        state.set_comments(vec![comment("Ada Lovelace")]);
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);

        CommentList.render(area, &mut buf, &mut state);

        let rendered: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(rendered.contains("Ada Lovelace"));
        assert!(rendered.contains("nice shot"));
        assert!(!rendered.contains("<b>"));
    }
}
