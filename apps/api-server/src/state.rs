//! Application state - shared across all handlers.

use std::sync::Arc;

use agora_core::ports::{
    CommentRepository, FileStore, PasswordService, PostRepository, TokenService, UserRepository,
};
use agora_core::service::{CommentService, LikeService, SavedItemsService};
use agora_infra::auth::{BcryptPasswordService, JwtTokenService, ResetTokenVault};
use agora_infra::database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
};
use agora_infra::files::DiskFileStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub comment_service: CommentService,
    pub likes: LikeService,
    pub saved: SavedItemsService,
    pub reset_vault: ResetTokenVault,
}

impl AppState {
    /// Build the application state with the in-memory document store and a
    /// disk-backed file store.
    pub fn new(config: &AppConfig) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        let comments: Arc<dyn CommentRepository> = Arc::new(InMemoryCommentRepository::new());
        let files: Arc<dyn FileStore> = Arc::new(DiskFileStore::new(&config.upload_dir));
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let passwords: Arc<dyn PasswordService> = Arc::new(BcryptPasswordService::new());

        let comment_service =
            CommentService::new(comments.clone(), posts.clone(), users.clone(), files);
        let likes = LikeService::new(posts.clone(), comments.clone());
        let saved = SavedItemsService::new(users.clone(), posts.clone());
        let reset_vault = ResetTokenVault::new(users.clone(), passwords.clone());

        tracing::info!("Application state initialized (in-memory document store)");

        Self {
            users,
            posts,
            comments,
            tokens,
            passwords,
            comment_service,
            likes,
            saved,
            reset_vault,
        }
    }
}
