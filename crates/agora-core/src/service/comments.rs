//! Comment tree operations.
//!
//! Every mutation here is a sequence of independent document writes: the
//! comment document first, then the post's denormalized comment-id list.
//! There is no transaction spanning the two, so a crash in between leaves a
//! bounded, detectable inconsistency that a reconciliation pass can repair
//! by comparing comment existence against list membership.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Attachment, Comment, CommentBody, UserSummary, MAX_ATTACHMENTS};
use crate::error::DomainError;
use crate::ports::{BaseRepository, CommentRepository, FileStore, PostRepository, UserRepository};

/// Upper bound on comment content length.
const MAX_CONTENT_LEN: usize = 500;

/// A file handed in alongside a comment mutation, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A comment with its author reference expanded to the public subset.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Option<UserSummary>,
}

/// A comment plus its direct replies, all with authors expanded.
#[derive(Debug, Clone)]
pub struct CommentDetail {
    pub comment: Comment,
    pub author: Option<UserSummary>,
    pub replies: Vec<CommentWithAuthor>,
}

/// Comment tree service: creation, threading, editing, soft deletion and
/// attachment management.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    files: Arc<dyn FileStore>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
            files,
        }
    }

    /// Create a root comment on a post. The post must exist; the new
    /// comment's id is recorded on the post's comment list after the comment
    /// document is written.
    pub async fn create(
        &self,
        post_id: Uuid,
        author: Uuid,
        content: String,
        uploads: Vec<NewAttachment>,
    ) -> Result<CommentWithAuthor, DomainError> {
        let content = validate_content(content)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let attachments = self.store_uploads(uploads, 0).await?;
        let comment = Comment::new(author, post.id, content, attachments);

        let comment = self.comments.save(comment).await?;
        self.posts.push_comment(post.id, comment.id).await?;

        let author = self.author_summary(author).await?;
        Ok(CommentWithAuthor { comment, author })
    }

    /// Create a reply under an existing comment. The reply's post reference
    /// is inherited from the parent; any client-supplied post id is ignored
    /// by construction.
    pub async fn reply(
        &self,
        parent_id: Uuid,
        author: Uuid,
        content: String,
        uploads: Vec<NewAttachment>,
    ) -> Result<CommentWithAuthor, DomainError> {
        let content = validate_content(content)?;

        let parent = self
            .comments
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", parent_id))?;

        let attachments = self.store_uploads(uploads, 0).await?;
        let comment = Comment::reply(author, &parent, content, attachments);

        let comment = self.comments.save(comment).await?;
        self.posts.push_comment(parent.post, comment.id).await?;

        let author = self.author_summary(author).await?;
        Ok(CommentWithAuthor { comment, author })
    }

    /// Fetch a comment with author and direct replies expanded.
    pub async fn get(&self, id: Uuid) -> Result<CommentDetail, DomainError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", id))?;

        self.expand(comment).await
    }

    /// Top-level comments of a post, paginated, each with direct replies.
    /// Returns the page plus the total number of top-level comments.
    pub async fn list_for_post(
        &self,
        post_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<CommentDetail>, u64), DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let total = self.comments.count_top_level(post_id).await?;
        let page_items = self.comments.find_top_level(post_id, page, limit).await?;

        let mut details = Vec::with_capacity(page_items.len());
        for comment in page_items {
            details.push(self.expand(comment).await?);
        }

        Ok((details, total))
    }

    /// Replace the content of a pre-loaded, ownership-checked comment and
    /// append any new attachments. The attachment cap counts retained plus
    /// newly added entries.
    pub async fn update(
        &self,
        mut comment: Comment,
        content: String,
        uploads: Vec<NewAttachment>,
    ) -> Result<Comment, DomainError> {
        let content = validate_content(content)?;

        let existing = match &comment.body {
            CommentBody::Active { attachments, .. } => attachments.len(),
            CommentBody::Tombstoned => {
                return Err(DomainError::Validation(
                    "Cannot edit a deleted comment".to_string(),
                ));
            }
        };

        let mut new_attachments = self.store_uploads(uploads, existing).await?;

        if let CommentBody::Active {
            content: existing_content,
            attachments,
        } = &mut comment.body
        {
            *existing_content = content;
            attachments.append(&mut new_attachments);
        }
        comment.updated_at = Utc::now();

        Ok(self.comments.save(comment).await?)
    }

    /// Soft-delete a pre-loaded, ownership-checked comment: tombstone the
    /// document, reclaim its stored files best-effort, and drop its id from
    /// the post's comment list. Replies are left untouched and keep their
    /// parent reference.
    pub async fn soft_delete(&self, mut comment: Comment) -> Result<(), DomainError> {
        let cleared = comment.tombstone();
        let post_id = comment.post;
        let comment_id = comment.id;

        self.comments.save(comment).await?;

        for attachment in cleared {
            self.delete_file_best_effort(&attachment.path).await;
        }

        self.posts.pull_comment(post_id, comment_id).await?;
        Ok(())
    }

    /// Remove one attachment, located by filename, from a pre-loaded,
    /// ownership-checked comment. The stored file is reclaimed best-effort;
    /// the document update always completes.
    pub async fn remove_attachment(
        &self,
        mut comment: Comment,
        filename: &str,
    ) -> Result<Comment, DomainError> {
        let removed = match &mut comment.body {
            CommentBody::Active { attachments, .. } => {
                match attachments.iter().position(|a| a.filename == filename) {
                    Some(idx) => attachments.remove(idx),
                    None => return Err(DomainError::not_found("attachment", filename)),
                }
            }
            CommentBody::Tombstoned => {
                return Err(DomainError::not_found("attachment", filename));
            }
        };

        self.delete_file_best_effort(&removed.path).await;

        comment.updated_at = Utc::now();
        Ok(self.comments.save(comment).await?)
    }

    async fn expand(&self, comment: Comment) -> Result<CommentDetail, DomainError> {
        let author = self.author_summary(comment.author).await?;

        let mut replies = Vec::new();
        for reply in self.comments.find_replies(comment.id).await? {
            let author = self.author_summary(reply.author).await?;
            replies.push(CommentWithAuthor {
                comment: reply,
                author,
            });
        }

        Ok(CommentDetail {
            comment,
            author,
            replies,
        })
    }

    async fn author_summary(&self, id: Uuid) -> Result<Option<UserSummary>, DomainError> {
        Ok(self.users.find_by_id(id).await?.map(|u| u.summary()))
    }

    /// Persist uploads through the file store, enforcing the attachment cap
    /// against `existing` entries already on the comment.
    async fn store_uploads(
        &self,
        uploads: Vec<NewAttachment>,
        existing: usize,
    ) -> Result<Vec<Attachment>, DomainError> {
        if existing + uploads.len() > MAX_ATTACHMENTS {
            return Err(DomainError::Validation(format!(
                "A comment can carry at most {MAX_ATTACHMENTS} attachments"
            )));
        }

        let mut attachments = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let filename = storage_filename(&upload.original_name);
            let path = self
                .files
                .store(&filename, &upload.data)
                .await
                .map_err(|e| DomainError::Validation(e.to_string()))?;

            attachments.push(Attachment {
                filename,
                original_name: upload.original_name,
                path,
                content_type: upload.content_type,
                size: upload.data.len() as u64,
                uploaded_at: Utc::now(),
            });
        }

        Ok(attachments)
    }

    async fn delete_file_best_effort(&self, path: &str) {
        if let Err(e) = self.files.delete(path).await {
            tracing::warn!(path, error = %e, "attachment file cleanup failed");
        }
    }
}

fn validate_content(content: String) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "Comment content is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(DomainError::Validation(format!(
            "Comment content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Unique storage name for an upload, keeping a sanitized trace of the
/// original for operators reading the blob directory.
fn storage_filename(original: &str) -> String {
    let sanitized: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", Uuid::new_v4(), sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed_and_bounded() {
        assert_eq!(validate_content("  hi  ".into()).unwrap(), "hi");
        assert!(validate_content("   ".into()).is_err());
        assert!(validate_content("x".repeat(MAX_CONTENT_LEN + 1)).is_err());
    }

    #[test]
    fn storage_filename_sanitizes() {
        let name = storage_filename("weird name?.png");
        assert!(name.ends_with("weird_name_.png"));
        assert!(!name.contains(' '));
        assert!(!name.contains('?'));
    }
}
