use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
use uuid::Uuid;

use scribe_core::domain::{PageRequest, Post};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(title: &str, seq: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        seq,
        author_id: Uuid::new_v4(),
        title: title.to_owned(),
        slug: scribe_core::domain::derive_slug(title),
        content: "Content".to_owned(),
        excerpt: "Content...".to_owned(),
        tags: serde_json::json!(["rust", "web"]),
        is_published: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model("Test Post", 1);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.slug, "test-post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.tags, vec!["rust", "web"]);
}

#[tokio::test]
async fn test_find_published_keeps_store_order() {
    let newer = post_model("Newer", 2);
    let older = post_model("Older", 1);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![newer, older]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.find_published(0, 10).await.unwrap();

    let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[tokio::test]
async fn test_insert_returns_stored_post() {
    let model = post_model("Inserted", 7);
    let post: Post = model.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = repo.insert(post.clone()).await.unwrap();

    assert_eq!(saved, post);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_connection_failure_is_classified() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Conn(RuntimeErr::Internal(
            "connection refused".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.find_by_author(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::Connection(_))));
}

#[tokio::test]
async fn test_page_past_bigint_range_is_empty() {
    // No query results queued: the window is rejected before any SQL runs.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    let request = PageRequest::parse(Some("1000000000000000000"), Some("10"));
    let posts = repo
        .find_published(request.offset(), request.per_page())
        .await
        .unwrap();

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_oversized_limit_still_queries() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model("Only", 1)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let request = PageRequest::parse(Some("1"), Some("9223372036854775807"));
    let posts = repo
        .find_published(request.offset(), request.per_page())
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
}
