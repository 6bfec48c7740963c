use byline::{
    AuthorChanges, Config, Error, NewAuthor, NewPost, PostChanges, Store, ValidationError,
};
use byline_core::{CoreError, InMemoryAuthorDirectory};

/// Create a store backed by an in-memory database.
async fn create_test_store() -> Store {
    Store::open(&Config::new("sqlite::memory:")).await.unwrap()
}

fn content(chars: usize) -> String {
    "x".repeat(chars)
}

fn validation(err: Error) -> ValidationError {
    match err {
        Error::Validation(e) => e,
        other => panic!("expected validation error, got {}", other),
    }
}

// ============================================================================
// Author tests
// ============================================================================

#[tokio::test]
async fn test_first_author_with_name_succeeds_second_fails() {
    let store = create_test_store().await;

    let first = store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();
    assert_eq!(first.name, "Ada Lovelace");

    let err = store
        .create_author(NewAuthor::new("Ada Lovelace", "5559876543"))
        .await
        .unwrap_err();
    assert_eq!(
        validation(err),
        ValidationError::DuplicateName("Ada Lovelace".to_string())
    );
    assert_eq!(store.list_authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_author_requires_name() {
    let store = create_test_store().await;

    let err = store
        .create_author(NewAuthor::new("", "5551234567"))
        .await
        .unwrap_err();
    assert_eq!(validation(err), ValidationError::MissingName);
}

#[tokio::test]
async fn test_author_phone_numbers() {
    let store = create_test_store().await;

    store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();

    for (i, bad) in ["555-123-4567", "12345", "55512345678", "555123456x"]
        .iter()
        .enumerate()
    {
        let err = store
            .create_author(NewAuthor::new(format!("Author {}", i), *bad))
            .await
            .unwrap_err();
        assert_eq!(validation(err).field(), "phone_number", "{} accepted", bad);
    }
    assert_eq!(store.list_authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_author_revalidates_fields() {
    let store = create_test_store().await;

    let ada = store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();
    store
        .create_author(NewAuthor::new("Grace Hopper", "5557654321"))
        .await
        .unwrap();

    // Taking another author's name fails
    let err = store
        .update_author(
            ada.id,
            AuthorChanges {
                name: Some("Grace Hopper".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        validation(err),
        ValidationError::DuplicateName(_)
    ));

    // A bad phone number aborts the whole update, including a valid rename
    let err = store
        .update_author(
            ada.id,
            AuthorChanges {
                name: Some("Countess Lovelace".to_string()),
                phone_number: Some("123".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(validation(err).field(), "phone_number");
    let unchanged = store.get_author(ada.id).await.unwrap().unwrap();
    assert_eq!(unchanged.name, "Ada Lovelace");
    assert!(unchanged.updated_at.is_none());

    // A valid update is persisted and stamped
    let updated = store
        .update_author(
            ada.id,
            AuthorChanges {
                name: Some("Countess Lovelace".to_string()),
                phone_number: Some("5550000000".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Countess Lovelace");
    assert_eq!(updated.phone_number, "5550000000");
    assert!(updated.updated_at.is_some());

    // The old name is free again
    store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_missing_author() {
    let store = create_test_store().await;

    let err = store
        .update_author(7, AuthorChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "author", id: 7 }));
}

#[tokio::test]
async fn test_find_author_by_name() {
    let store = create_test_store().await;

    let ada = store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();

    assert_eq!(
        store.find_author_by_name("Ada Lovelace").await.unwrap(),
        Some(ada)
    );
    assert!(store.find_author_by_name("Grace").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_duplicate_names() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("byline.db").display());
    let store = Store::open(&Config::new(url)).await.unwrap();

    let (a, b) = tokio::join!(
        store.create_author(NewAuthor::new("Ada Lovelace", "5551234567")),
        store.create_author(NewAuthor::new("Ada Lovelace", "5559876543")),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results {
        if let Err(err) = result {
            assert_eq!(
                validation(err),
                ValidationError::DuplicateName("Ada Lovelace".to_string())
            );
        }
    }
    assert_eq!(store.list_authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_renames_to_same_name() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("byline.db").display());
    let store = Store::open(&Config::new(url)).await.unwrap();

    let ada = store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();
    let grace = store
        .create_author(NewAuthor::new("Grace Hopper", "5557654321"))
        .await
        .unwrap();

    let rename = || AuthorChanges {
        name: Some("Countess".to_string()),
        ..Default::default()
    };
    let (a, b) = tokio::join!(
        store.update_author(ada.id, rename()),
        store.update_author(grace.id, rename()),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results {
        if let Err(err) = result {
            assert_eq!(
                validation(err),
                ValidationError::DuplicateName("Countess".to_string())
            );
        }
    }

    let names: Vec<String> = store
        .list_authors()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names.iter().filter(|n| *n == "Countess").count(), 1);
}

#[tokio::test]
async fn test_store_validator_against_external_directory() {
    let store = create_test_store().await;
    let directory = InMemoryAuthorDirectory::new();
    directory.insert("Ada Lovelace", "5551234567");

    // The store's rules apply to any directory, not just its own table.
    let err = store
        .validator()
        .validate_name("Ada Lovelace", &directory)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::DuplicateName(_))
    ));
    assert!(store
        .validator()
        .validate_name("Grace Hopper", &directory)
        .is_ok());
}

#[tokio::test]
async fn test_memory_store_survives_pool_maintenance() {
    let store = create_test_store().await;
    let options = store.pool().options();

    assert_eq!(options.get_max_connections(), 1);
    assert!(options.get_idle_timeout().is_none());
    assert!(options.get_max_lifetime().is_none());

    store
        .create_author(NewAuthor::new("Ada Lovelace", "5551234567"))
        .await
        .unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ============================================================================
// Post tests
// ============================================================================

#[tokio::test]
async fn test_create_post() {
    let store = create_test_store().await;

    let post = store
        .create_post(
            NewPost::new("Top 10 Tips", content(250))
                .with_summary("")
                .with_category("Non-Fiction"),
        )
        .await
        .unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.title, "Top 10 Tips");
    assert_eq!(post.summary.as_deref(), Some(""));
    assert_eq!(post.category.as_deref(), Some("Non-Fiction"));
    assert!(post.updated_at.is_none());
    assert_eq!(store.get_post(1).await.unwrap(), Some(post));
}

#[tokio::test]
async fn test_post_titles() {
    let store = create_test_store().await;

    for title in [
        "Top 10 Tips",
        "You Won't Believe What Happened",
        "The Secret Life of Bees",
        "Guess Who's Back",
    ] {
        store
            .create_post(NewPost::new(title, content(250)))
            .await
            .unwrap();
    }

    for (title, expected) in [
        ("A Great Day", ValidationError::TitleNotClickbait),
        ("", ValidationError::EmptyTitle),
        ("   ", ValidationError::EmptyTitle),
        ("top tips", ValidationError::TitleNotClickbait),
    ] {
        let err = store
            .create_post(NewPost::new(title, content(250)))
            .await
            .unwrap_err();
        assert_eq!(validation(err), expected);
    }

    assert_eq!(store.list_posts().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_post_length_bounds() {
    let store = create_test_store().await;

    let err = store
        .create_post(NewPost::new("Top Picks", content(249)))
        .await
        .unwrap_err();
    assert_eq!(
        validation(err),
        ValidationError::ContentTooShort {
            min: 250,
            actual: 249
        }
    );

    let err = store
        .create_post(NewPost::new("Top Picks", content(250)).with_summary(content(251)))
        .await
        .unwrap_err();
    assert_eq!(validation(err).field(), "summary");

    store
        .create_post(NewPost::new("Top Picks", content(250)).with_summary(content(250)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_categories() {
    let store = create_test_store().await;

    for category in ["Fiction", "Non-Fiction"] {
        store
            .create_post(NewPost::new("Top Picks", content(250)).with_category(category))
            .await
            .unwrap();
    }
    for category in ["fiction", "Non-fiction", "Poetry", ""] {
        let err = store
            .create_post(NewPost::new("Top Picks", content(250)).with_category(category))
            .await
            .unwrap_err();
        assert_eq!(validation(err).field(), "category");
    }
}

#[tokio::test]
async fn test_update_post_is_all_or_nothing() {
    let store = create_test_store().await;

    let post = store
        .create_post(NewPost::new("Top Picks", content(300)).with_category("Fiction"))
        .await
        .unwrap();

    let err = store
        .update_post(
            post.id,
            PostChanges {
                title: Some("Secret Picks".to_string()),
                category: Some("Poetry".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(validation(err).field(), "category");
    assert_eq!(store.get_post(post.id).await.unwrap(), Some(post.clone()));

    let updated = store
        .update_post(
            post.id,
            PostChanges {
                title: Some("Secret Picks".to_string()),
                summary: Some("Short and sweet".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Secret Picks");
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.summary.as_deref(), Some("Short and sweet"));
    assert_eq!(updated.category.as_deref(), Some("Fiction"));
    assert!(updated.updated_at.is_some());
}

// ============================================================================
// Rule configuration tests
// ============================================================================

#[tokio::test]
async fn test_store_with_rules_file() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("rules.json");
    std::fs::write(
        &rules_path,
        r#"{"post": {"categories": ["Poetry"], "min_content_chars": 10}}"#,
    )
    .unwrap();

    let config = Config::new("sqlite::memory:").with_rules_path(&rules_path);
    let store = Store::open(&config).await.unwrap();

    store
        .create_post(NewPost::new("Top Verses", content(10)).with_category("Poetry"))
        .await
        .unwrap();

    let err = store
        .create_post(NewPost::new("Top Verses", content(10)).with_category("Fiction"))
        .await
        .unwrap_err();
    assert_eq!(validation(err).field(), "category");
}

#[tokio::test]
async fn test_store_with_missing_rules_file() {
    let config = Config::new("sqlite::memory:").with_rules_path("/nonexistent/rules.json");
    let result = Store::open(&config).await;
    assert!(matches!(result, Err(Error::Config(_))));
}
