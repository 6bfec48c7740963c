//! Byline Core - Entity records, rules, and validation.
//!
//! This crate contains the synchronous domain logic for authors and posts.
//! It has no dependencies on other Byline crates and performs no I/O.

pub mod entity;
pub mod error;
pub mod rules;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use entity::{Author, AuthorChanges, NewAuthor, NewPost, Post, PostChanges};
pub use error::{CoreError, StorageError, ValidationError};
pub use rules::{AuthorRules, PostRules, Rules};
pub use storage::AuthorDirectory;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryAuthorDirectory;
