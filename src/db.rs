use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use byline_core::{Author, Post};

/// Get current time as milliseconds since Unix epoch.
pub fn current_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn from_epoch_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Initialize database connection pool with recommended pragmas.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let pool_options = if database_url.contains(":memory:") {
        // Every connection to an in-memory database sees its own empty
        // database, so keep exactly one connection open for the pool's lifetime.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    pool_options.connect_with(options).await
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../migrations/001_create_authors_and_posts.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    phone_number: String,
    created_at: i64,
    updated_at: Option<i64>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            id: row.id,
            name: row.name,
            phone_number: row.phone_number,
            created_at: from_epoch_ms(row.created_at),
            updated_at: row.updated_at.map(from_epoch_ms),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    summary: Option<String>,
    category: Option<String>,
    created_at: i64,
    updated_at: Option<i64>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            content: row.content,
            summary: row.summary,
            category: row.category,
            created_at: from_epoch_ms(row.created_at),
            updated_at: row.updated_at.map(from_epoch_ms),
        }
    }
}

const AUTHOR_COLUMNS: &str = "id, name, phone_number, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, content, summary, category, created_at, updated_at";

/// Insert a new author. Fails with a unique violation if the name is taken.
pub async fn insert_author(
    pool: &SqlitePool,
    name: &str,
    phone_number: &str,
) -> Result<Author, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO authors (name, phone_number, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(phone_number)
    .bind(current_epoch_ms())
    .execute(pool)
    .await?;

    get_author(pool, result.last_insert_rowid())
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_author(pool: &SqlitePool, id: i64) -> Result<Option<Author>, sqlx::Error> {
    let row = sqlx::query_as::<_, AuthorRow>(&format!(
        "SELECT {} FROM authors WHERE id = ?",
        AUTHOR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Author::from))
}

/// Look up an author by exact (case-sensitive) name.
pub async fn find_author_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<Author>, sqlx::Error> {
    let row = sqlx::query_as::<_, AuthorRow>(&format!(
        "SELECT {} FROM authors WHERE name = ?",
        AUTHOR_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Author::from))
}

/// Get all authors ordered by id.
pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<Author>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AuthorRow>(&format!(
        "SELECT {} FROM authors ORDER BY id ASC",
        AUTHOR_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Author::from).collect())
}

/// Update the given author fields and stamp `updated_at`.
/// Returns `None` if no author has this id.
pub async fn update_author(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    phone_number: Option<&str>,
) -> Result<Option<Author>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE authors
        SET name = COALESCE(?, name),
            phone_number = COALESCE(?, phone_number),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(phone_number)
    .bind(current_epoch_ms())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_author(pool, id).await
}

pub async fn insert_post(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    summary: Option<&str>,
    category: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, content, summary, category, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(summary)
    .bind(category)
    .bind(current_epoch_ms())
    .execute(pool)
    .await?;

    get_post(pool, result.last_insert_rowid())
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {} FROM posts WHERE id = ?",
        POST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Post::from))
}

/// Get all posts ordered by id.
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {} FROM posts ORDER BY id ASC",
        POST_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Post::from).collect())
}

/// Update the given post fields and stamp `updated_at`.
/// Returns `None` if no post has this id.
pub async fn update_post(
    pool: &SqlitePool,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
    summary: Option<&str>,
    category: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE(?, title),
            content = COALESCE(?, content),
            summary = COALESCE(?, summary),
            category = COALESCE(?, category),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(summary)
    .bind(category)
    .bind(current_epoch_ms())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_post(pool, id).await
}
