//! Per-user saved-items bookkeeping.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::SavedKind;
use crate::error::DomainError;
use crate::ports::{BaseRepository, PostRepository, UserRepository};

/// Saved-items service: validates the referenced item, then flips membership
/// in the user's per-kind saved set through the store's atomic toggle.
#[derive(Clone)]
pub struct SavedItemsService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl SavedItemsService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Flip `item_id`'s membership in the user's saved set for `kind`.
    /// Returns the resulting membership.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: SavedKind,
    ) -> Result<bool, DomainError> {
        if self.posts.find_by_id(item_id).await?.is_none() {
            return Err(DomainError::not_found("post", item_id));
        }

        self.users
            .toggle_saved(user_id, item_id, kind)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// Pure membership query: is `item_id` in the user's saved set for
    /// `kind`?
    pub async fn is_saved(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: SavedKind,
    ) -> Result<bool, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        Ok(user.saved.contains(kind, item_id))
    }
}
