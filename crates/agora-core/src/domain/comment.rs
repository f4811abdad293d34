use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of attachments a comment may carry, counted across
/// retained and newly added entries.
pub const MAX_ATTACHMENTS: usize = 2;

/// Content shown in place of a soft-deleted comment.
pub const DELETED_PLACEHOLDER: &str = "This comment has been deleted";

/// Descriptor for a file attached to a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// The mutable part of a comment.
///
/// Soft deletion swaps `Active` for `Tombstoned` instead of overwriting
/// fields, so identity and tree edges cannot drift: a tombstoned comment
/// keeps its id, author, post and parent references, and replies pointing at
/// it stay attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CommentBody {
    Active {
        content: String,
        #[serde(default)]
        attachments: Vec<Attachment>,
    },
    Tombstoned,
}

/// Comment entity - a node in a post's discussion tree.
///
/// Invariant: when `parent` is set, the parent comment belongs to the same
/// post; the comment service derives `post` from the parent on reply and
/// ignores client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: Uuid,
    pub post: Uuid,
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(flatten)]
    pub body: CommentBody,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a root comment on a post.
    pub fn new(author: Uuid, post: Uuid, content: String, attachments: Vec<Attachment>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author,
            post,
            parent: None,
            body: CommentBody::Active {
                content,
                attachments,
            },
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply under `parent`, inheriting the parent's post.
    pub fn reply(
        author: Uuid,
        parent: &Comment,
        content: String,
        attachments: Vec<Attachment>,
    ) -> Self {
        let mut comment = Self::new(author, parent.post, content, attachments);
        comment.parent = Some(parent.id);
        comment
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.body, CommentBody::Tombstoned)
    }

    /// Visible content; tombstones render the fixed placeholder.
    pub fn content(&self) -> &str {
        match &self.body {
            CommentBody::Active { content, .. } => content,
            CommentBody::Tombstoned => DELETED_PLACEHOLDER,
        }
    }

    pub fn attachments(&self) -> &[Attachment] {
        match &self.body {
            CommentBody::Active { attachments, .. } => attachments,
            CommentBody::Tombstoned => &[],
        }
    }

    /// Mark deleted, returning the attachments that were cleared so the
    /// caller can reclaim the stored files.
    pub fn tombstone(&mut self) -> Vec<Attachment> {
        let cleared = match std::mem::replace(&mut self.body, CommentBody::Tombstoned) {
            CommentBody::Active { attachments, .. } => attachments,
            CommentBody::Tombstoned => Vec::new(),
        };
        self.updated_at = Utc::now();
        cleared
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str) -> Attachment {
        Attachment {
            filename: format!("{name}.bin"),
            original_name: name.to_string(),
            path: format!("/uploads/{name}.bin"),
            content_type: "application/octet-stream".to_string(),
            size: 3,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn reply_inherits_post_and_parent() {
        let root = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "root".into(), vec![]);
        let reply = Comment::reply(Uuid::new_v4(), &root, "child".into(), vec![]);

        assert_eq!(reply.post, root.post);
        assert_eq!(reply.parent, Some(root.id));
    }

    #[test]
    fn tombstone_replaces_content_and_clears_attachments() {
        let mut comment = Comment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "hello".into(),
            vec![attachment("a")],
        );
        let id = comment.id;
        let parent = comment.parent;

        let cleared = comment.tombstone();

        assert!(comment.is_deleted());
        assert_eq!(comment.content(), DELETED_PLACEHOLDER);
        assert!(comment.attachments().is_empty());
        assert_eq!(cleared.len(), 1);
        // Identity and edges survive deletion.
        assert_eq!(comment.id, id);
        assert_eq!(comment.parent, parent);
    }

    #[test]
    fn tombstone_twice_is_idempotent() {
        let mut comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "x".into(), vec![]);
        comment.tombstone();
        assert!(comment.tombstone().is_empty());
        assert!(comment.is_deleted());
    }
}
