//! The collection interface shared by every scraper.
//!
//! Filters are JSON objects matched by containment: a document matches when
//! every key in the filter is present with a matching value, recursively
//! (`{"source": {"platform": "Lemon8"}}` matches any Lemon8 review). The
//! empty object matches everything. Patches merge at the top level.

use std::future::Future;

use serde_json::Value;

use crate::{Collection, DbError};

/// Result of an insert-or-update keyed by a natural id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

pub trait DocumentStore {
    /// First matching document in insertion order.
    fn find_one(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> impl Future<Output = Result<Option<Value>, DbError>> + Send;

    /// All matching documents in insertion order.
    fn find(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> impl Future<Output = Result<Vec<Value>, DbError>> + Send;

    /// Insert `doc` under `key`. Returns `false` and leaves the stored
    /// document untouched when `key` already exists.
    fn insert(
        &self,
        collection: Collection,
        key: &str,
        doc: &Value,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Insert `doc` under `key`, or merge its fields into the existing document.
    fn upsert(
        &self,
        collection: Collection,
        key: &str,
        doc: &Value,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    /// Merge `patch` into every matching document and remove the `unset`
    /// fields. Returns the number of documents touched.
    fn update_many(
        &self,
        collection: Collection,
        filter: &Value,
        patch: &Value,
        unset: &[&str],
    ) -> impl Future<Output = Result<u64, DbError>> + Send;

    fn count(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Delete every matching document. Returns the number removed.
    fn delete_many(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> impl Future<Output = Result<u64, DbError>> + Send;
}

/// JSON containment with the semantics of Postgres `jsonb @>`.
#[must_use]
pub fn json_contains(doc: &Value, filter: &Value) -> bool {
    match (doc, filter) {
        (Value::Object(d), Value::Object(f)) => f
            .iter()
            .all(|(k, fv)| d.get(k).is_some_and(|dv| json_contains(dv, fv))),
        (Value::Array(d), Value::Array(f)) => f
            .iter()
            .all(|fv| d.iter().any(|dv| json_contains(dv, fv))),
        // numbers compare by value so 1 and 1.0 match, as in jsonb
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (d, f) => d == f,
    }
}

/// Shallow merge of `patch` into `doc`, then removal of `unset` keys.
pub fn merge_patch(doc: &mut Value, patch: &Value, unset: &[&str]) {
    if let (Value::Object(target), Value::Object(fields)) = (&mut *doc, patch) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    if let Value::Object(target) = doc {
        for key in unset {
            target.remove(*key);
        }
    }
}
