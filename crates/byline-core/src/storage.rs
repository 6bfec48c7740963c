use crate::entity::Author;
use crate::error::StorageError;

/// Lookup capability handed to name validation.
///
/// Name uniqueness is the one rule that depends on other records, so the
/// validator receives the collection explicitly instead of reaching for it.
pub trait AuthorDirectory {
    /// Find a persisted author carrying exactly this name.
    fn find_by_name(&self, name: &str) -> Result<Option<Author>, StorageError>;
}

/// The result of a lookup that already happened, e.g. an async database
/// query performed by the caller just before validating.
impl AuthorDirectory for Option<Author> {
    fn find_by_name(&self, name: &str) -> Result<Option<Author>, StorageError> {
        Ok(self.as_ref().filter(|a| a.name == name).cloned())
    }
}

impl AuthorDirectory for [Author] {
    fn find_by_name(&self, name: &str) -> Result<Option<Author>, StorageError> {
        Ok(self.iter().find(|a| a.name == name).cloned())
    }
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::RwLock;

    use chrono::Utc;

    /// In-memory author directory for testing.
    #[derive(Default)]
    pub struct InMemoryAuthorDirectory {
        authors: RwLock<BTreeMap<i64, Author>>,
    }

    impl InMemoryAuthorDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert an author without validation, assigning the next id.
        pub fn insert(&self, name: &str, phone_number: &str) -> Author {
            let mut authors = self.authors.write().unwrap();
            let id = authors.keys().next_back().copied().unwrap_or(0) + 1;
            let author = Author {
                id,
                name: name.to_string(),
                phone_number: phone_number.to_string(),
                created_at: Utc::now(),
                updated_at: None,
            };
            authors.insert(id, author.clone());
            author
        }

        pub fn len(&self) -> usize {
            self.authors.read().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl AuthorDirectory for InMemoryAuthorDirectory {
        fn find_by_name(&self, name: &str) -> Result<Option<Author>, StorageError> {
            let authors = self
                .authors
                .read()
                .map_err(|_| StorageError::Database("author directory lock poisoned".to_string()))?;
            Ok(authors.values().find(|a| a.name == name).cloned())
        }
    }

}
