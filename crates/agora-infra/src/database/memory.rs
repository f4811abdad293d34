//! In-memory document store - the reference implementation of the
//! repository contract, also used by the service-level tests.
//!
//! Each repository is a `HashMap` of documents behind an async `RwLock`.
//! Every toggle and list update runs under a single write lock, which makes
//! them the atomic conditional add/remove operations the like and
//! saved-item flows require; a fetch-then-save sequence would not be.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::domain::{Comment, Post, SavedKind, User};
use agora_core::error::RepoError;
use agora_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

/// Flip `member`'s membership in a vec with set semantics. Returns the
/// resulting membership.
fn toggle_membership(set: &mut Vec<Uuid>, member: Uuid) -> bool {
    if let Some(idx) = set.iter().position(|m| *m == member) {
        set.remove(idx);
        false
    } else {
        set.push(member);
        true
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_reset_digest(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|u| {
                u.reset_password_token.as_deref() == Some(digest)
                    && u.reset_password_expire.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn toggle_saved(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: SavedKind,
    ) -> Result<Option<bool>, RepoError> {
        let mut store = self.store.write().await;
        let Some(user) = store.get_mut(&user_id) else {
            return Ok(None);
        };

        let saved = toggle_membership(user.saved.ids_mut(kind), item_id);
        user.updated_at = Utc::now();
        Ok(Some(saved))
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        let mut users: Vec<User> = store.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn toggle_like(&self, post_id: Uuid, actor: Uuid) -> Result<Option<bool>, RepoError> {
        let mut store = self.store.write().await;
        let Some(post) = store.get_mut(&post_id) else {
            return Ok(None);
        };

        Ok(Some(toggle_membership(&mut post.likes, actor)))
    }

    async fn push_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        // A vanished post is tolerated: the comment document then exists
        // without a listing, the bounded inconsistency reconciliation sweeps.
        if let Some(post) = store.get_mut(&post_id) {
            post.comments.push(comment_id);
        }
        Ok(())
    }

    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        if let Some(post) = store.get_mut(&post_id) {
            post.comments.retain(|id| *id != comment_id);
        }
        Ok(())
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    store: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn toggle_like(&self, comment_id: Uuid, actor: Uuid) -> Result<Option<bool>, RepoError> {
        let mut store = self.store.write().await;
        let Some(comment) = store.get_mut(&comment_id) else {
            return Ok(None);
        };

        Ok(Some(toggle_membership(&mut comment.likes, actor)))
    }

    async fn find_top_level(
        &self,
        post_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        let mut top_level: Vec<Comment> = store
            .values()
            .filter(|c| c.post == post_id && c.parent.is_none())
            .cloned()
            .collect();
        top_level.sort_by_key(|c| c.created_at);

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok(top_level
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect())
    }

    async fn count_top_level(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|c| c.post == post_id && c.parent.is_none())
            .count() as u64)
    }

    async fn find_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        let mut replies: Vec<Comment> = store
            .values()
            .filter(|c| c.parent == Some(parent_id))
            .cloned()
            .collect();
        replies.sort_by_key(|c| c.created_at);
        Ok(replies)
    }
}
