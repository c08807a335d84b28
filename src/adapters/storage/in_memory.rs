//! In-Memory Document Store Adapter
//!
//! Keeps every collection in process memory. Used for tests and local
//! development; supports failure injection so callers' degraded paths
//! can be exercised.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{Collection, Persistence, PersistenceError, QueryFilter};

type Documents = HashMap<Collection, BTreeMap<String, Value>>;

/// In-memory document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<Documents>>,
    unavailable: Arc<AtomicBool>,
    puts: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `PersistenceError::Unavailable`
    /// until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `put` calls so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for InMemoryStore {
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<Value>, PersistenceError> {
        self.check_available()?;
        let documents = self.documents.read().await;
        Ok(documents
            .get(&collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: Value,
    ) -> Result<(), PersistenceError> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        documents
            .entry(collection)
            .or_default()
            .insert(key.to_string(), value);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &QueryFilter,
    ) -> Result<Vec<Value>, PersistenceError> {
        self.check_available()?;
        let documents = self.documents.read().await;
        Ok(documents
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get(Collection::Usage, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_returns_document() {
        let store = InMemoryStore::new();
        store
            .put(Collection::Profiles, "u1", json!({"plan": "pro"}))
            .await
            .unwrap();

        let doc = store.get(Collection::Profiles, "u1").await.unwrap().unwrap();
        assert_eq!(doc["plan"], "pro");
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn put_replaces_existing_document() {
        let store = InMemoryStore::new();
        store.put(Collection::Profiles, "u1", json!({"plan": "free"})).await.unwrap();
        store.put(Collection::Profiles, "u1", json!({"plan": "pro"})).await.unwrap();

        let docs = store.query(Collection::Profiles, &QueryFilter::all()).await.unwrap();
        assert_eq!(docs.len(), 1);
        let doc = store.get(Collection::Profiles, "u1").await.unwrap().unwrap();
        assert_eq!(doc["plan"], "pro");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryStore::new();
        store.put(Collection::Profiles, "u1", json!({})).await.unwrap();
        assert!(store.get(Collection::Usage, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_applies_filter() {
        let store = InMemoryStore::new();
        store
            .put(Collection::Contracts, "c1", json!({"user_id": "u1", "status": "active"}))
            .await
            .unwrap();
        store
            .put(Collection::Contracts, "c2", json!({"user_id": "u2", "status": "active"}))
            .await
            .unwrap();

        let filter = QueryFilter::all().eq("user_id", "u1");
        let docs = store.query(Collection::Contracts, &filter).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["user_id"], "u1");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.get(Collection::Usage, "u1").await,
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(store.put(Collection::Usage, "u1", json!({})).await.is_err());
        assert!(store
            .query(Collection::Usage, &QueryFilter::all())
            .await
            .is_err());

        store.set_unavailable(false);
        assert!(store.get(Collection::Usage, "u1").await.is_ok());
    }
}
