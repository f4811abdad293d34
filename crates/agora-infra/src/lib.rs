//! # Agora Infrastructure
//!
//! Concrete implementations of the ports defined in `agora-core`:
//! credential services, the document store, and the attachment file store.

pub mod auth;
pub mod database;
pub mod files;

pub use auth::{BcryptPasswordService, JwtConfig, JwtTokenService, ResetTokenVault};
pub use database::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use files::{DiskFileStore, InMemoryFileStore};
