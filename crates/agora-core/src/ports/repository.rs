use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post, SavedKind, User};
use crate::error::RepoError;

/// Generic repository trait defining the store contract shared by all
/// document kinds: find by id, and create-or-replace.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find the user holding a reset-token digest whose expiry is still in
    /// the future. An expired match is no match.
    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError>;

    /// Atomically flip `item_id`'s membership in the user's saved set for
    /// `kind`: add if absent, remove if present, in one store operation.
    /// Returns the resulting membership, or `None` if the user is missing.
    async fn toggle_saved(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: SavedKind,
    ) -> Result<Option<bool>, RepoError>;

    /// List all users (administrative surface).
    async fn list(&self) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Atomically flip `actor`'s membership in the post's liker set.
    /// Returns the resulting membership, or `None` if the post is missing.
    async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<Option<bool>, RepoError>;

    /// Append a comment id to the post's denormalized comment list.
    async fn push_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    /// Remove a comment id from the post's denormalized comment list.
    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Atomically flip `actor`'s membership in the comment's liker set.
    /// Returns the resulting membership, or `None` if the comment is missing.
    async fn toggle_like(&self, comment_id: Uuid, actor: Uuid) -> Result<Option<bool>, RepoError>;

    /// Top-level comments of a post in creation order, paginated.
    /// `page` is 1-based.
    async fn find_top_level(
        &self,
        post_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError>;

    /// Number of top-level comments on a post.
    async fn count_top_level(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Direct replies to a comment in creation order.
    async fn find_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
