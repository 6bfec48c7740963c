//! Validated write path for authors and posts.
//!
//! Every create or update runs the field validators before touching the
//! database and issues a single statement afterwards, so a rejected field
//! never leaves the other fields of the same write committed.
//!
//! Name uniqueness is checked against the database before the write, and the
//! `UNIQUE` constraint on `authors.name` catches any concurrent writer that
//! slips in between the check and the insert.

use std::sync::Arc;

use sqlx::SqlitePool;

use byline_core::{
    Author, AuthorChanges, NewAuthor, NewPost, Post, PostChanges, Rules, Validator,
};

use crate::config::{load_rules, Config};
use crate::db;
use crate::error::Error;

/// Author and post records backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    validator: Arc<Validator>,
}

impl Store {
    pub fn new(pool: SqlitePool, rules: Rules) -> Self {
        Self {
            pool,
            validator: Arc::new(Validator::new(rules)),
        }
    }

    /// Connect, bring the schema up to date and load the configured rules.
    pub async fn open(config: &Config) -> Result<Self, Error> {
        let rules = load_rules(config.rules_path.as_deref())?;
        let pool = db::init_pool(&config.database_url).await?;
        db::run_migrations(&pool).await?;
        tracing::info!("Opened store at {}", config.database_url);
        Ok(Self::new(pool, rules))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub async fn create_author(&self, author: NewAuthor) -> Result<Author, Error> {
        let existing = db::find_author_by_name(&self.pool, &author.name).await?;
        self.validator
            .validate_new_author(&author, &existing)
            .map_err(|e| rejected("author", e))?;

        let created = db::insert_author(&self.pool, &author.name, &author.phone_number)
            .await
            .map_err(|e| rejected("author", Error::from_author_write(e, Some(&author.name))))?;

        tracing::debug!("Created {}", created);
        Ok(created)
    }

    /// Assign the supplied fields of an existing author.
    ///
    /// A new name is rejected if any persisted author already carries it,
    /// including this one.
    pub async fn update_author(&self, id: i64, changes: AuthorChanges) -> Result<Author, Error> {
        let current = db::get_author(&self.pool, id)
            .await?
            .ok_or(Error::NotFound { entity: "author", id })?;
        if changes.is_empty() {
            return Ok(current);
        }

        let existing = match &changes.name {
            Some(name) => db::find_author_by_name(&self.pool, name).await?,
            None => None,
        };
        self.validator
            .validate_author_changes(&changes, &existing)
            .map_err(|e| rejected("author", e))?;

        let updated = db::update_author(
            &self.pool,
            id,
            changes.name.as_deref(),
            changes.phone_number.as_deref(),
        )
        .await
        .map_err(|e| rejected("author", Error::from_author_write(e, changes.name.as_deref())))?
        .ok_or(Error::NotFound { entity: "author", id })?;

        tracing::debug!("Updated {}", updated);
        Ok(updated)
    }

    pub async fn get_author(&self, id: i64) -> Result<Option<Author>, Error> {
        Ok(db::get_author(&self.pool, id).await?)
    }

    pub async fn find_author_by_name(&self, name: &str) -> Result<Option<Author>, Error> {
        Ok(db::find_author_by_name(&self.pool, name).await?)
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>, Error> {
        Ok(db::list_authors(&self.pool).await?)
    }

    pub async fn create_post(&self, post: NewPost) -> Result<Post, Error> {
        self.validator
            .validate_new_post(&post)
            .map_err(|e| rejected("post", e))?;

        let created = db::insert_post(
            &self.pool,
            &post.title,
            &post.content,
            post.summary.as_deref(),
            post.category.as_deref(),
        )
        .await?;

        tracing::debug!("Created post {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Assign the supplied fields of an existing post.
    pub async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, Error> {
        let current = db::get_post(&self.pool, id)
            .await?
            .ok_or(Error::NotFound { entity: "post", id })?;
        if changes.is_empty() {
            return Ok(current);
        }

        self.validator
            .validate_post_changes(&changes)
            .map_err(|e| rejected("post", e))?;

        let updated = db::update_post(
            &self.pool,
            id,
            changes.title.as_deref(),
            changes.content.as_deref(),
            changes.summary.as_deref(),
            changes.category.as_deref(),
        )
        .await?
        .ok_or(Error::NotFound { entity: "post", id })?;

        tracing::debug!("Updated post {} ({})", updated.id, updated.title);
        Ok(updated)
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, Error> {
        Ok(db::get_post(&self.pool, id).await?)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        Ok(db::list_posts(&self.pool).await?)
    }
}

/// Log a rejected write and hand the error back.
fn rejected(entity: &'static str, err: impl Into<Error>) -> Error {
    let err = err.into();
    match &err {
        Error::Validation(e) => {
            tracing::warn!("Rejected {} write on field '{}': {}", entity, e.field(), e)
        }
        other => tracing::error!("Failed to write {}: {}", entity, other),
    }
    err
}
