//! Operations on the `newsarticles` collection.

use chrono::Utc;
use hdbwatch_core::Article;
use serde_json::{json, Value};

use crate::store::{DocumentStore, UpsertOutcome};
use crate::{Collection, DbError};

/// Which fields a re-scrape refreshes on an already stored article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleRefresh {
    /// Only `last_updated`.
    Timestamp,
    /// `last_updated` and `locations`.
    TimestampAndLocations,
}

/// Insert `article` unless an article with the same URL is stored, in which
/// case only the fields named by `refresh` are updated.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn save_article<S: DocumentStore>(
    store: &S,
    article: &Article,
    refresh: ArticleRefresh,
) -> Result<UpsertOutcome, DbError> {
    let by_url = json!({ "url": article.url });

    if store
        .find_one(Collection::NewsArticles, &by_url)
        .await?
        .is_some()
    {
        let mut patch = json!({ "last_updated": Utc::now() });
        if refresh == ArticleRefresh::TimestampAndLocations {
            patch["locations"] = json!(article.locations);
        }
        store
            .update_many(Collection::NewsArticles, &by_url, &patch, &[])
            .await?;
        return Ok(UpsertOutcome::Updated);
    }

    let doc = serde_json::to_value(article)?;
    // id already stored under a different URL
    if store
        .insert(Collection::NewsArticles, &article.article_id, &doc)
        .await?
    {
        Ok(UpsertOutcome::Inserted)
    } else {
        Ok(UpsertOutcome::Updated)
    }
}

/// Insert or overwrite an article keyed by `article_id`.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the store call fails.
pub async fn upsert_article<S: DocumentStore>(
    store: &S,
    article: &Article,
) -> Result<UpsertOutcome, DbError> {
    let doc = serde_json::to_value(article)?;
    store
        .upsert(Collection::NewsArticles, &article.article_id, &doc)
        .await
}

/// Total number of stored articles.
///
/// # Errors
///
/// Returns [`DbError`] if the store call fails.
pub async fn count_articles<S: DocumentStore>(store: &S) -> Result<u64, DbError> {
    store
        .count(Collection::NewsArticles, &Value::Object(serde_json::Map::new()))
        .await
}

#[cfg(test)]
#[path = "articles_test.rs"]
mod tests;
