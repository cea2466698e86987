use serde::Deserialize;

use crate::domain::entities::{Comment, PhotoRecord};

/// Popular photos page response.
#[derive(Debug, Deserialize)]
pub struct PhotosResponse {
    /// Photo records in service order.
    pub photos: Vec<PhotoRecord>,
    /// Total number of pages, when reported.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// A single comment as delivered by the service.
#[derive(Debug, Deserialize)]
pub struct CommentRecord {
    pub user_fullname: String,
    pub comment_body: String,
    pub user_picture_url: String,
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Self::new(
            record.user_fullname,
            record.comment_body,
            record.user_picture_url,
        )
    }
}

/// Comments response: either a bare array or wrapped in `{ "comments": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CommentsResponse {
    List(Vec<CommentRecord>),
    Wrapped { comments: Vec<CommentRecord> },
}

impl CommentsResponse {
    pub fn into_comments(self) -> Vec<Comment> {
        let records = match self {
            Self::List(records) | Self::Wrapped { comments: records } => records,
        };
        records.into_iter().map(Comment::from).collect()
    }
}
