use thiserror::Error;

use byline_core::{CoreError, StorageError, ValidationError};

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => Error::Validation(e),
            CoreError::Storage(e) => Error::Storage(e),
        }
    }
}

impl Error {
    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Map a failed author write, reporting a violated name constraint as
    /// the same duplicate-name rejection the field check raises.
    pub(crate) fn from_author_write(err: sqlx::Error, name: Option<&str>) -> Self {
        match (&err, name) {
            (sqlx::Error::Database(db_err), Some(name)) if db_err.is_unique_violation() => {
                Error::Validation(ValidationError::DuplicateName(name.to_string()))
            }
            _ => Error::Database(err),
        }
    }
}
