pub mod config;
pub mod db;
pub mod error;
pub mod store;

pub use byline_core::{
    Author, AuthorChanges, AuthorDirectory, AuthorRules, NewAuthor, NewPost, Post, PostChanges,
    PostRules, Rules, ValidationError, Validator,
};
pub use config::{load_rules, Config, ConfigError};
pub use db::{current_epoch_ms, init_pool, run_migrations};
pub use error::Error;
pub use store::Store;
