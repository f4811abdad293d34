//! Idempotent like toggling for posts and comments.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository};

/// Like toggle: one algorithm, two target collections.
///
/// The flip itself happens inside the repository as a single conditional
/// add-if-absent / remove-if-present operation, so rapid repeated toggles by
/// the same actor cannot lose updates the way a fetch-then-save would.
#[derive(Clone)]
pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Toggle `actor`'s like on a post. Returns the resulting membership.
    pub async fn toggle_post(&self, post_id: Uuid, actor: Uuid) -> Result<bool, DomainError> {
        self.posts
            .toggle_like(post_id, actor)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Toggle `actor`'s like on a comment. Returns the resulting membership.
    pub async fn toggle_comment(&self, comment_id: Uuid, actor: Uuid) -> Result<bool, DomainError> {
        self.comments
            .toggle_like(comment_id, actor)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}
