//! Lemon8 staging collections: raw posts awaiting analysis and quarantined
//! dirty data.

use chrono::Utc;
use hdbwatch_core::{DirtyData, RawPost};
use serde_json::json;
use uuid::Uuid;

use crate::reviews::{count_reviews_by_platform, delete_reviews_by_platform, LEMON8_PLATFORM};
use crate::store::DocumentStore;
use crate::{Collection, DbError};

/// Stage a raw post keyed by `post_id`. Returns `false` if already staged.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn insert_raw_post<S: DocumentStore>(store: &S, post: &RawPost) -> Result<bool, DbError> {
    let doc = serde_json::to_value(post)?;
    store
        .insert(Collection::Lemon8RawPosts, &post.post_id, &doc)
        .await
}

/// Raw posts with `processed = false`, in staging order.
///
/// # Errors
///
/// Returns [`DbError`] if the store call fails or a document is malformed.
pub async fn list_unprocessed_raw_posts<S: DocumentStore>(
    store: &S,
) -> Result<Vec<RawPost>, DbError> {
    store
        .find(Collection::Lemon8RawPosts, &json!({ "processed": false }))
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(DbError::from))
        .collect()
}

/// Mark a raw post analyzed, recording the failure reason if there was one.
///
/// # Errors
///
/// Returns [`DbError`] if the store call fails.
pub async fn mark_raw_post_processed<S: DocumentStore>(
    store: &S,
    post_id: &str,
    error: Option<&str>,
) -> Result<(), DbError> {
    let patch = json!({
        "processed": true,
        "analyzed_at": Utc::now(),
        "error": error,
    });
    store
        .update_many(
            Collection::Lemon8RawPosts,
            &json!({ "post_id": post_id }),
            &patch,
            &[],
        )
        .await?;
    Ok(())
}

/// Quarantine a raw post that failed analysis.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn insert_dirty_data<S: DocumentStore>(
    store: &S,
    record: &DirtyData,
) -> Result<(), DbError> {
    let doc = serde_json::to_value(record)?;
    let key = Uuid::new_v4().to_string();
    store
        .insert(Collection::Lemon8DirtyData, &key, &doc)
        .await?;
    Ok(())
}

/// Point-in-time counts across the Lemon8 collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lemon8Counts {
    pub reviews: u64,
    pub raw_posts: u64,
    pub processed: u64,
    pub unprocessed: u64,
    pub dirty: u64,
}

/// # Errors
///
/// Returns [`DbError`] if any count fails.
pub async fn lemon8_counts<S: DocumentStore>(store: &S) -> Result<Lemon8Counts, DbError> {
    Ok(Lemon8Counts {
        reviews: count_reviews_by_platform(store, LEMON8_PLATFORM).await?,
        raw_posts: store.count(Collection::Lemon8RawPosts, &json!({})).await?,
        processed: store
            .count(Collection::Lemon8RawPosts, &json!({ "processed": true }))
            .await?,
        unprocessed: store
            .count(Collection::Lemon8RawPosts, &json!({ "processed": false }))
            .await?,
        dirty: store.count(Collection::Lemon8DirtyData, &json!({})).await?,
    })
}

/// What [`reset_lemon8`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub reviews_deleted: u64,
    pub raw_posts_reset: u64,
    pub dirty_cleared: u64,
}

/// Undo analysis: delete Lemon8 reviews, return every raw post to
/// unprocessed, and clear dirty data.
///
/// # Errors
///
/// Returns [`DbError`] if any store call fails.
pub async fn reset_lemon8<S: DocumentStore>(store: &S) -> Result<ResetReport, DbError> {
    let reviews_deleted = delete_reviews_by_platform(store, LEMON8_PLATFORM).await?;
    let raw_posts_reset = store
        .update_many(
            Collection::Lemon8RawPosts,
            &json!({}),
            &json!({ "processed": false }),
            &["analyzed_at", "error"],
        )
        .await?;
    let dirty_cleared = store
        .delete_many(Collection::Lemon8DirtyData, &json!({}))
        .await?;

    tracing::info!(
        reviews_deleted,
        raw_posts_reset,
        dirty_cleared,
        "lemon8 data reset"
    );
    Ok(ResetReport {
        reviews_deleted,
        raw_posts_reset,
        dirty_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn raw_post(id: &str) -> RawPost {
        RawPost {
            post_id: id.to_string(),
            estate: "Punggol".to_string(),
            title: format!("Post {id}"),
            content: "Living by the waterway".to_string(),
            full_text: String::new(),
            account_name: "Jo".to_string(),
            account_handle: "jo".to_string(),
            post_url: format!("https://www.lemon8-app.com/@jo/{id}"),
            hashtags: vec!["#punggol".to_string()],
            processed: false,
            analyzed_at: None,
            error: None,
            collected_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn processed_posts_are_not_listed_again() {
        let store = MemoryStore::new();
        insert_raw_post(&store, &raw_post("1")).await.unwrap();
        insert_raw_post(&store, &raw_post("2")).await.unwrap();

        mark_raw_post_processed(&store, "1", None).await.unwrap();

        let pending = list_unprocessed_raw_posts(&store).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].post_id, "2");
    }

    #[tokio::test]
    async fn staging_is_idempotent() {
        let store = MemoryStore::new();
        assert!(insert_raw_post(&store, &raw_post("1")).await.unwrap());
        assert!(!insert_raw_post(&store, &raw_post("1")).await.unwrap());
        assert_eq!(lemon8_counts(&store).await.unwrap().raw_posts, 1);
    }

    #[tokio::test]
    async fn processing_error_is_recorded() {
        let store = MemoryStore::new();
        insert_raw_post(&store, &raw_post("1")).await.unwrap();
        mark_raw_post_processed(&store, "1", Some("Not a housing review"))
            .await
            .unwrap();

        let doc = store
            .find_one(Collection::Lemon8RawPosts, &json!({"post_id": "1"}))
            .await
            .unwrap()
            .unwrap();
        let post: RawPost = serde_json::from_value(doc).unwrap();
        assert!(post.processed);
        assert!(post.analyzed_at.is_some());
        assert_eq!(post.error.as_deref(), Some("Not a housing review"));
    }

    #[tokio::test]
    async fn reset_restores_unprocessed_state() {
        let store = MemoryStore::new();
        insert_raw_post(&store, &raw_post("1")).await.unwrap();
        insert_raw_post(&store, &raw_post("2")).await.unwrap();
        mark_raw_post_processed(&store, "1", Some("spam")).await.unwrap();
        mark_raw_post_processed(&store, "2", None).await.unwrap();
        insert_dirty_data(
            &store,
            &DirtyData {
                raw_post_id: "1".to_string(),
                estate: "Punggol".to_string(),
                reason: "spam".to_string(),
                title: "Post 1".to_string(),
                flagged_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        let report = reset_lemon8(&store).await.unwrap();
        assert_eq!(report.raw_posts_reset, 2);
        assert_eq!(report.dirty_cleared, 1);

        let counts = lemon8_counts(&store).await.unwrap();
        assert_eq!(counts.unprocessed, 2);
        assert_eq!(counts.processed, 0);
        assert_eq!(counts.dirty, 0);

        let doc = store
            .find_one(Collection::Lemon8RawPosts, &json!({"post_id": "1"}))
            .await
            .unwrap()
            .unwrap();
        assert!(doc.get("error").is_none());
        assert!(doc.get("analyzed_at").is_none());
    }
}
