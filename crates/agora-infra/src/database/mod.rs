//! Document store implementations.

pub mod memory;

pub use memory::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(test)]
mod tests;
