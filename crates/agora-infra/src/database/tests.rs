//! Scenario tests driving the domain services against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use agora_core::domain::{Post, SavedKind, User, DELETED_PLACEHOLDER};
use agora_core::error::DomainError;
use agora_core::ports::{
    BaseRepository, CommentRepository, FileStore, PostRepository, UserRepository,
};
use agora_core::service::{CommentService, LikeService, NewAttachment, SavedItemsService};

use crate::database::memory::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
};
use crate::files::InMemoryFileStore;

struct Fixture {
    users: Arc<InMemoryUserRepository>,
    posts: Arc<InMemoryPostRepository>,
    comments: Arc<InMemoryCommentRepository>,
    files: Arc<InMemoryFileStore>,
    comment_service: CommentService,
    likes: LikeService,
    saved: SavedItemsService,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let files = Arc::new(InMemoryFileStore::new());

    let users_dyn: Arc<dyn UserRepository> = users.clone();
    let posts_dyn: Arc<dyn PostRepository> = posts.clone();
    let comments_dyn: Arc<dyn CommentRepository> = comments.clone();
    let files_dyn: Arc<dyn FileStore> = files.clone();

    let comment_service = CommentService::new(
        comments_dyn.clone(),
        posts_dyn.clone(),
        users_dyn.clone(),
        files_dyn,
    );
    let likes = LikeService::new(posts_dyn.clone(), comments_dyn);
    let saved = SavedItemsService::new(users_dyn, posts_dyn);

    Fixture {
        users,
        posts,
        comments,
        files,
        comment_service,
        likes,
        saved,
    }
}

async fn seed_user(f: &Fixture, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        username.to_uppercase(),
        "not-a-real-hash".to_string(),
    );
    f.users.save(user).await.unwrap()
}

async fn seed_post(f: &Fixture, author: Uuid) -> Post {
    f.posts
        .save(Post::new(author, "title".into(), "content".into()))
        .await
        .unwrap()
}

fn upload(name: &str) -> NewAttachment {
    NewAttachment {
        original_name: format!("{name}.png"),
        content_type: "image/png".to_string(),
        data: vec![1, 2, 3],
    }
}

#[tokio::test]
async fn create_writes_comment_then_lists_it_on_post() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;
    let post = seed_post(&f, author.id).await;

    let created = f
        .comment_service
        .create(post.id, author.id, "first!".into(), vec![])
        .await
        .unwrap();

    assert_eq!(created.comment.post, post.id);
    assert_eq!(created.comment.parent, None);
    assert_eq!(created.author.as_ref().unwrap().username, "alice");

    let stored_post = f.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored_post.comments, vec![created.comment.id]);
}

#[tokio::test]
async fn create_on_missing_post_is_not_found() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;

    let result = f
        .comment_service
        .create(Uuid::new_v4(), author.id, "hello".into(), vec![])
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn reply_inherits_post_from_parent() {
    let f = fixture();
    let alice = seed_user(&f, "alice").await;
    let bob = seed_user(&f, "bob").await;
    let post = seed_post(&f, alice.id).await;

    let root = f
        .comment_service
        .create(post.id, bob.id, "root".into(), vec![])
        .await
        .unwrap();
    let reply = f
        .comment_service
        .reply(root.comment.id, alice.id, "reply".into(), vec![])
        .await
        .unwrap();

    assert_eq!(reply.comment.post, post.id);
    assert_eq!(reply.comment.parent, Some(root.comment.id));

    let stored_post = f.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(
        stored_post.comments,
        vec![root.comment.id, reply.comment.id]
    );
}

#[tokio::test]
async fn reply_to_missing_comment_is_not_found() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;

    let result = f
        .comment_service
        .reply(Uuid::new_v4(), author.id, "hello".into(), vec![])
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

// The full soft-delete scenario: the tombstoned comment keeps its identity
// and its reply, the reply stays fetchable, and only the tombstoned id is
// dropped from the post's list.
#[tokio::test]
async fn soft_delete_keeps_replies_attached() {
    let f = fixture();
    let alice = seed_user(&f, "alice").await;
    let bob = seed_user(&f, "bob").await;
    let post = seed_post(&f, alice.id).await;

    let c1 = f
        .comment_service
        .create(post.id, bob.id, "c1".into(), vec![upload("photo")])
        .await
        .unwrap();
    let r1 = f
        .comment_service
        .reply(c1.comment.id, alice.id, "r1".into(), vec![])
        .await
        .unwrap();

    let loaded = f.comments.find_by_id(c1.comment.id).await.unwrap().unwrap();
    f.comment_service.soft_delete(loaded).await.unwrap();

    let tombstone = f.comments.find_by_id(c1.comment.id).await.unwrap().unwrap();
    assert!(tombstone.is_deleted());
    assert_eq!(tombstone.content(), DELETED_PLACEHOLDER);
    assert!(tombstone.attachments().is_empty());

    let surviving_reply = f.comments.find_by_id(r1.comment.id).await.unwrap().unwrap();
    assert_eq!(surviving_reply.parent, Some(c1.comment.id));
    assert!(!surviving_reply.is_deleted());

    let stored_post = f.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert!(!stored_post.comments.contains(&c1.comment.id));
    assert!(stored_post.comments.contains(&r1.comment.id));

    // Attachment files were reclaimed.
    assert!(f.files.is_empty().await);

    // The tombstone still expands, replies included.
    let detail = f.comment_service.get(c1.comment.id).await.unwrap();
    assert_eq!(detail.replies.len(), 1);
    assert_eq!(detail.replies[0].comment.id, r1.comment.id);
}

#[tokio::test]
async fn attachment_cap_applies_on_create() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;
    let post = seed_post(&f, author.id).await;

    let result = f
        .comment_service
        .create(
            post.id,
            author.id,
            "too many".into(),
            vec![upload("a"), upload("b"), upload("c")],
        )
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    // Nothing was stored for the rejected mutation.
    assert!(f.files.is_empty().await);
}

#[tokio::test]
async fn attachment_cap_counts_retained_entries_on_update() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;
    let post = seed_post(&f, author.id).await;

    let created = f
        .comment_service
        .create(post.id, author.id, "one file".into(), vec![upload("a")])
        .await
        .unwrap();

    // One more fits under the cap.
    let loaded = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    let updated = f
        .comment_service
        .update(loaded, "edited".into(), vec![upload("b")])
        .await
        .unwrap();
    assert_eq!(updated.content(), "edited");
    assert_eq!(updated.attachments().len(), 2);

    // Any further addition exceeds it.
    let loaded = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    let result = f
        .comment_service
        .update(loaded, "edited again".into(), vec![upload("c")])
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    // Two at once on a one-attachment comment is rejected outright.
    let fresh = f
        .comment_service
        .create(post.id, author.id, "another".into(), vec![upload("x")])
        .await
        .unwrap();
    let loaded = f.comments.find_by_id(fresh.comment.id).await.unwrap().unwrap();
    let result = f
        .comment_service
        .update(loaded, "nope".into(), vec![upload("y"), upload("z")])
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn update_on_tombstone_is_rejected() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;
    let post = seed_post(&f, author.id).await;

    let created = f
        .comment_service
        .create(post.id, author.id, "soon gone".into(), vec![])
        .await
        .unwrap();
    let loaded = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    f.comment_service.soft_delete(loaded).await.unwrap();

    let tombstone = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    let result = f
        .comment_service
        .update(tombstone, "resurrected?".into(), vec![])
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn remove_attachment_by_filename() {
    let f = fixture();
    let author = seed_user(&f, "alice").await;
    let post = seed_post(&f, author.id).await;

    let created = f
        .comment_service
        .create(post.id, author.id, "with file".into(), vec![upload("doc")])
        .await
        .unwrap();
    let filename = created.comment.attachments()[0].filename.clone();
    assert_eq!(f.files.len().await, 1);

    let loaded = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    let updated = f
        .comment_service
        .remove_attachment(loaded, &filename)
        .await
        .unwrap();

    assert!(updated.attachments().is_empty());
    assert!(f.files.is_empty().await);

    let loaded = f.comments.find_by_id(created.comment.id).await.unwrap().unwrap();
    let result = f.comment_service.remove_attachment(loaded, &filename).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn like_toggles_are_involutions() {
    let f = fixture();
    let alice = seed_user(&f, "alice").await;
    let post = seed_post(&f, alice.id).await;
    let comment = f
        .comment_service
        .create(post.id, alice.id, "like me".into(), vec![])
        .await
        .unwrap();

    assert!(f.likes.toggle_post(post.id, alice.id).await.unwrap());
    assert!(!f.likes.toggle_post(post.id, alice.id).await.unwrap());

    assert!(f
        .likes
        .toggle_comment(comment.comment.id, alice.id)
        .await
        .unwrap());
    assert!(!f
        .likes
        .toggle_comment(comment.comment.id, alice.id)
        .await
        .unwrap());

    let missing = f.likes.toggle_post(Uuid::new_v4(), alice.id).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn saved_items_toggle_and_query() {
    let f = fixture();
    let alice = seed_user(&f, "alice").await;
    let post = seed_post(&f, alice.id).await;

    assert!(f
        .saved
        .toggle(alice.id, post.id, SavedKind::Problem)
        .await
        .unwrap());
    assert!(f
        .saved
        .is_saved(alice.id, post.id, SavedKind::Problem)
        .await
        .unwrap());
    // The other kind keeps its own set.
    assert!(!f
        .saved
        .is_saved(alice.id, post.id, SavedKind::Post)
        .await
        .unwrap());

    assert!(!f
        .saved
        .toggle(alice.id, post.id, SavedKind::Problem)
        .await
        .unwrap());
    assert!(!f
        .saved
        .is_saved(alice.id, post.id, SavedKind::Problem)
        .await
        .unwrap());

    let missing_item = f.saved.toggle(alice.id, Uuid::new_v4(), SavedKind::Post).await;
    assert!(matches!(missing_item, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn list_for_post_pages_top_level_with_replies() {
    let f = fixture();
    let alice = seed_user(&f, "alice").await;
    let post = seed_post(&f, alice.id).await;

    let mut roots = Vec::new();
    for i in 0..3 {
        roots.push(
            f.comment_service
                .create(post.id, alice.id, format!("c{i}"), vec![])
                .await
                .unwrap(),
        );
    }
    f.comment_service
        .reply(roots[0].comment.id, alice.id, "r".into(), vec![])
        .await
        .unwrap();

    let (page1, total) = f.comment_service.list_for_post(post.id, 1, 2).await.unwrap();
    let (page2, _) = f.comment_service.list_for_post(post.id, 2, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 1);

    // Replies never appear as top-level entries.
    let listed: Vec<Uuid> = page1
        .iter()
        .chain(page2.iter())
        .map(|d| d.comment.id)
        .collect();
    for root in &roots {
        assert!(listed.contains(&root.comment.id));
    }

    let first = f.comment_service.get(roots[0].comment.id).await.unwrap();
    assert_eq!(first.replies.len(), 1);
    assert_eq!(first.author.as_ref().unwrap().username, "alice");

    let missing = f.comment_service.list_for_post(Uuid::new_v4(), 1, 2).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}
