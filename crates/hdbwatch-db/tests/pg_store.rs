//! Live tests for the Postgres document store using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated database from the sqlx harness.
//! They need a reachable Postgres in `DATABASE_URL`, so they are ignored by
//! default; run with `cargo test -p hdbwatch-db -- --ignored`.

use hdbwatch_db::{Collection, DocumentStore, PgDocumentStore, UpsertOutcome};
use serde_json::json;

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres"]
async fn upsert_reports_insert_then_update(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    let doc = json!({"review_id": "reddit-abc", "rating": 4});

    let first = store
        .upsert(Collection::Reviews, "reddit-abc", &doc)
        .await
        .expect("first upsert");
    let second = store
        .upsert(Collection::Reviews, "reddit-abc", &json!({"rating": 5}))
        .await
        .expect("second upsert");

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::Updated);

    let stored = store
        .find_one(Collection::Reviews, &json!({"review_id": "reddit-abc"}))
        .await
        .expect("find")
        .expect("document present");
    assert_eq!(stored, json!({"review_id": "reddit-abc", "rating": 5}));
    assert_eq!(
        store.count(Collection::Reviews, &json!({})).await.expect("count"),
        1
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres"]
async fn insert_skips_existing_key(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    assert!(store
        .insert(Collection::NewsArticles, "a", &json!({"v": 1}))
        .await
        .expect("insert"));
    assert!(!store
        .insert(Collection::NewsArticles, "a", &json!({"v": 2}))
        .await
        .expect("insert"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres"]
async fn update_many_merges_and_unsets(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    for id in ["1", "2"] {
        store
            .insert(
                Collection::Lemon8RawPosts,
                id,
                &json!({"post_id": id, "processed": true, "error": "x"}),
            )
            .await
            .expect("insert");
    }

    let touched = store
        .update_many(
            Collection::Lemon8RawPosts,
            &json!({}),
            &json!({"processed": false}),
            &["error"],
        )
        .await
        .expect("update");
    assert_eq!(touched, 2);

    let docs = store
        .find(Collection::Lemon8RawPosts, &json!({"processed": false}))
        .await
        .expect("find");
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|d| d.get("error").is_none()));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres"]
async fn nested_filter_selects_platform(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    store
        .insert(Collection::Reviews, "r", &json!({"source": {"platform": "Reddit"}}))
        .await
        .expect("insert");
    store
        .insert(Collection::Reviews, "l", &json!({"source": {"platform": "Lemon8"}}))
        .await
        .expect("insert");

    let deleted = store
        .delete_many(Collection::Reviews, &json!({"source": {"platform": "Lemon8"}}))
        .await
        .expect("delete");
    assert_eq!(deleted, 1);
    assert_eq!(
        store.count(Collection::Reviews, &json!({})).await.expect("count"),
        1
    );
}
