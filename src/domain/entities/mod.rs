//! Domain entity definitions.

mod comment;
mod image;
mod photo;

pub use comment::Comment;
pub use self::image::{
    ImageKey, ImageSource, LoadedImage, RequestToken, SlotId, is_image_content_type,
};
pub use photo::{PhotoId, PhotoInfo, PhotoRecord, safe_photos};
