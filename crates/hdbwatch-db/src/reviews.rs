//! Operations on the `reviews` collection.

use hdbwatch_core::Review;
use serde_json::{json, Value};

use crate::store::{DocumentStore, UpsertOutcome};
use crate::{Collection, DbError};

pub const REDDIT_PLATFORM: &str = "Reddit";
pub const LEMON8_PLATFORM: &str = "Lemon8";

fn platform_filter(platform: &str) -> Value {
    json!({ "source": { "platform": platform } })
}

/// Insert or overwrite a review keyed by `review_id`.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn upsert_review<S: DocumentStore>(
    store: &S,
    review: &Review,
) -> Result<UpsertOutcome, DbError> {
    let doc = serde_json::to_value(review)?;
    store.upsert(Collection::Reviews, &review.review_id, &doc).await
}

/// Insert `review` unless one from the same platform and post URL is stored.
///
/// Reviews without a URL are de-duplicated by `review_id` alone. Returns
/// whether the review was inserted.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn insert_review_if_new<S: DocumentStore>(
    store: &S,
    review: &Review,
) -> Result<bool, DbError> {
    if !review.source.url.is_empty() {
        let filter = json!({
            "source": { "platform": review.source.platform, "url": review.source.url }
        });
        if store.find_one(Collection::Reviews, &filter).await?.is_some() {
            return Ok(false);
        }
    }
    let doc = serde_json::to_value(review)?;
    store.insert(Collection::Reviews, &review.review_id, &doc).await
}

/// Every review from `platform`, in insertion order.
///
/// # Errors
///
/// Returns [`DbError`] if the store call fails or a document does not
/// deserialize as a [`Review`].
pub async fn list_reviews_by_source<S: DocumentStore>(
    store: &S,
    platform: &str,
) -> Result<Vec<Review>, DbError> {
    store
        .find(Collection::Reviews, &platform_filter(platform))
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(DbError::from))
        .collect()
}

/// # Errors
///
/// Returns [`DbError`] if the store call fails.
pub async fn count_reviews<S: DocumentStore>(store: &S) -> Result<u64, DbError> {
    store.count(Collection::Reviews, &json!({})).await
}

/// # Errors
///
/// Returns [`DbError`] if the store call fails.
pub async fn count_reviews_by_platform<S: DocumentStore>(
    store: &S,
    platform: &str,
) -> Result<u64, DbError> {
    store
        .count(Collection::Reviews, &platform_filter(platform))
        .await
}

pub(crate) async fn delete_reviews_by_platform<S: DocumentStore>(
    store: &S,
    platform: &str,
) -> Result<u64, DbError> {
    store
        .delete_many(Collection::Reviews, &platform_filter(platform))
        .await
}
