mod comment_list;
mod photo_grid;
mod status_bar;

pub use comment_list::{CommentList, CommentThreadState, ThreadState};
pub use photo_grid::{GRID_COLUMNS, PhotoGrid, PhotoGridState, TILE_HEIGHT, Thumbnail};
pub use status_bar::{StatusBar, StatusLevel};
