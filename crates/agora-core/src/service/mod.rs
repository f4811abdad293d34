//! Domain services - business flows expressed against the ports.

mod comments;
mod likes;
mod saved;

pub use comments::{CommentDetail, CommentService, CommentWithAuthor, NewAttachment};
pub use likes::LikeService;
pub use saved::SavedItemsService;
