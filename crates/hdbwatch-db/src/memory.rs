use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::store::{json_contains, merge_patch, DocumentStore, UpsertOutcome};
use crate::{Collection, DbError};

#[derive(Debug)]
struct Entry {
    collection: Collection,
    key: String,
    body: Value,
}

/// In-process [`DocumentStore`] with the same semantics as the Postgres
/// store. Documents are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> Result<Option<Value>, DbError> {
        Ok(self
            .lock()
            .iter()
            .find(|e| e.collection == collection && json_contains(&e.body, filter))
            .map(|e| e.body.clone()))
    }

    async fn find(&self, collection: Collection, filter: &Value) -> Result<Vec<Value>, DbError> {
        Ok(self
            .lock()
            .iter()
            .filter(|e| e.collection == collection && json_contains(&e.body, filter))
            .map(|e| e.body.clone())
            .collect())
    }

    async fn insert(&self, collection: Collection, key: &str, doc: &Value) -> Result<bool, DbError> {
        let mut entries = self.lock();
        if entries
            .iter()
            .any(|e| e.collection == collection && e.key == key)
        {
            return Ok(false);
        }
        entries.push(Entry {
            collection,
            key: key.to_string(),
            body: doc.clone(),
        });
        Ok(true)
    }

    async fn upsert(
        &self,
        collection: Collection,
        key: &str,
        doc: &Value,
    ) -> Result<UpsertOutcome, DbError> {
        let mut entries = self.lock();
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.collection == collection && e.key == key)
        {
            merge_patch(&mut existing.body, doc, &[]);
            return Ok(UpsertOutcome::Updated);
        }
        entries.push(Entry {
            collection,
            key: key.to_string(),
            body: doc.clone(),
        });
        Ok(UpsertOutcome::Inserted)
    }

    async fn update_many(
        &self,
        collection: Collection,
        filter: &Value,
        patch: &Value,
        unset: &[&str],
    ) -> Result<u64, DbError> {
        let mut touched = 0;
        for entry in self
            .lock()
            .iter_mut()
            .filter(|e| e.collection == collection && json_contains(&e.body, filter))
        {
            merge_patch(&mut entry.body, patch, unset);
            touched += 1;
        }
        Ok(touched)
    }

    async fn count(&self, collection: Collection, filter: &Value) -> Result<u64, DbError> {
        let n = self
            .lock()
            .iter()
            .filter(|e| e.collection == collection && json_contains(&e.body, filter))
            .count();
        Ok(u64::try_from(n).unwrap_or(u64::MAX))
    }

    async fn delete_many(&self, collection: Collection, filter: &Value) -> Result<u64, DbError> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| !(e.collection == collection && json_contains(&e.body, filter)));
        Ok(u64::try_from(before - entries.len()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_twice_keeps_one_document() {
        let store = MemoryStore::new();
        let doc = json!({"review_id": "reddit-abc", "rating": 4});

        let first = store.upsert(Collection::Reviews, "reddit-abc", &doc).await.unwrap();
        let second = store.upsert(Collection::Reviews, "reddit-abc", &doc).await.unwrap();

        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(store.count(Collection::Reviews, &json!({})).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_does_not_overwrite() {
        let store = MemoryStore::new();
        assert!(store
            .insert(Collection::NewsArticles, "a", &json!({"v": 1}))
            .await
            .unwrap());
        assert!(!store
            .insert(Collection::NewsArticles, "a", &json!({"v": 2}))
            .await
            .unwrap());
        let doc = store
            .find_one(Collection::NewsArticles, &json!({}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["v"], 1);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Reviews, "k", &json!({"x": 1}))
            .await
            .unwrap();
        assert_eq!(store.count(Collection::NewsArticles, &json!({})).await.unwrap(), 0);
        assert!(store
            .insert(Collection::NewsArticles, "k", &json!({"x": 1}))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn update_and_delete_respect_filter() {
        let store = MemoryStore::new();
        for (key, platform) in [("r1", "Reddit"), ("l1", "Lemon8"), ("l2", "Lemon8")] {
            store
                .insert(
                    Collection::Reviews,
                    key,
                    &json!({"source": {"platform": platform}, "status": "approved"}),
                )
                .await
                .unwrap();
        }
        let lemon8 = json!({"source": {"platform": "Lemon8"}});

        let touched = store
            .update_many(Collection::Reviews, &lemon8, &json!({"flag": true}), &["status"])
            .await
            .unwrap();
        assert_eq!(touched, 2);
        assert_eq!(
            store
                .count(Collection::Reviews, &json!({"status": "approved"}))
                .await
                .unwrap(),
            1
        );

        let deleted = store.delete_many(Collection::Reviews, &lemon8).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count(Collection::Reviews, &json!({})).await.unwrap(), 1);
    }
}
