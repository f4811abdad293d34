//! # Agora Core
//!
//! The domain layer of the Agora forum backend.
//! This crate contains pure business logic with zero infrastructure
//! dependencies: entities, the ports the infrastructure implements, and the
//! services that coordinate multi-document mutations.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
