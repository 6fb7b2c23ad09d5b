//! In-memory document store.
//!
//! Used by the test suites and local development. Key order stands in for
//! insertion order, so repositories that need time ordering use sortable
//! keys (the lead repository prefixes keys with a millisecond timestamp).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{Document, DocumentStore, StoreError, merge_shallow};

type Collection = BTreeMap<String, Document>;

/// In-process [`DocumentStore`] backed by nested maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Collection>>,
    watchers: Mutex<HashMap<(String, String), watch::Sender<Option<Document>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, collection: &str, key: &str, value: Option<&Document>) {
        let watchers = self.watchers.lock().expect("watcher map poisoned");
        if let Some(tx) = watchers.get(&(collection.to_owned(), key.to_owned())) {
            let _ = tx.send(value.cloned());
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().expect("store poisoned");
        Ok(inner.get(collection).and_then(|c| c.get(key)).cloned())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let inner = self.inner.read().expect("store poisoned");
        let Some(col) = inner.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(col
            .iter()
            .filter(|(_, doc)| doc.get(field).and_then(Document::as_str) == Some(value))
            .map(|(k, doc)| (k.clone(), doc.clone()))
            .collect())
    }

    async fn list(
        &self,
        collection: &str,
        limit_to_last: Option<usize>,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let inner = self.inner.read().expect("store poisoned");
        let Some(col) = inner.get(collection) else {
            return Ok(Vec::new());
        };
        let mut rows: Vec<(String, Document)> = col
            .iter()
            .map(|(k, doc)| (k.clone(), doc.clone()))
            .collect();
        if let Some(n) = limit_to_last
            && rows.len() > n
        {
            rows.drain(..rows.len() - n);
        }
        Ok(rows)
    }

    async fn put(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.write().expect("store poisoned");
            inner
                .entry(collection.to_owned())
                .or_default()
                .insert(key.to_owned(), doc.clone());
        }
        self.notify(collection, key, Some(&doc));
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<(), StoreError> {
        let merged = {
            let mut inner = self.inner.write().expect("store poisoned");
            let col = inner.entry(collection.to_owned()).or_default();
            let doc = col
                .entry(key.to_owned())
                .or_insert_with(|| Document::Object(serde_json::Map::new()));
            merge_shallow(doc, partial);
            doc.clone()
        };
        self.notify(collection, key, Some(&merged));
        Ok(())
    }

    async fn append(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Document,
    ) -> Result<(), StoreError> {
        let merged = {
            let mut inner = self.inner.write().expect("store poisoned");
            let col = inner.entry(collection.to_owned()).or_default();
            let doc = col
                .entry(key.to_owned())
                .or_insert_with(|| Document::Object(serde_json::Map::new()));
            if let Some(obj) = doc.as_object_mut() {
                let arr = obj
                    .entry(field.to_owned())
                    .or_insert_with(|| Document::Array(Vec::new()));
                if let Some(items) = arr.as_array_mut()
                    && !items.contains(&value)
                {
                    items.push(value);
                }
            }
            doc.clone()
        };
        self.notify(collection, key, Some(&merged));
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.write().expect("store poisoned");
            if let Some(col) = inner.get_mut(collection) {
                col.remove(key);
            }
        }
        self.notify(collection, key, None);
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<watch::Receiver<Option<Document>>, StoreError> {
        let current = self.get(collection, key).await?;
        let mut watchers = self.watchers.lock().expect("watcher map poisoned");
        let tx = watchers
            .entry((collection.to_owned(), key.to_owned()))
            .or_insert_with(|| watch::channel(current).0);
        Ok(tx.subscribe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("agents", "agent-1", json!({ "name": "Asha" }))
            .await
            .unwrap();
        let doc = store.get("agents", "agent-1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Asha");
        assert!(store.get("agents", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_eq_matches_string_fields() {
        let store = MemoryStore::new();
        store
            .put("agents", "a", json!({ "email": "a@x.com" }))
            .await
            .unwrap();
        store
            .put("agents", "b", json!({ "email": "b@x.com" }))
            .await
            .unwrap();
        let hits = store.find_eq("agents", "email", "b@x.com").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().map(|(k, _)| k.as_str()), Some("b"));
    }

    #[tokio::test]
    async fn test_list_limit_to_last_keeps_newest() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .put("leads", &format!("{i:03}"), json!({ "n": i }))
                .await
                .unwrap();
        }
        let rows = store.list("leads", Some(2)).await.unwrap();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["003", "004"]);
    }

    #[tokio::test]
    async fn test_update_merges_shallow() {
        let store = MemoryStore::new();
        store
            .put("leads", "l1", json!({ "status": "new", "note": "x" }))
            .await
            .unwrap();
        store
            .update("leads", "l1", json!({ "status": "contacted" }))
            .await
            .unwrap();
        let doc = store.get("leads", "l1").await.unwrap().unwrap();
        assert_eq!(doc["status"], "contacted");
        assert_eq!(doc["note"], "x");
    }

    #[tokio::test]
    async fn test_append_is_set_like() {
        let store = MemoryStore::new();
        store
            .append("config", "superusers", "emails", json!("root@x.com"))
            .await
            .unwrap();
        store
            .append("config", "superusers", "emails", json!("root@x.com"))
            .await
            .unwrap();
        store
            .append("config", "superusers", "emails", json!("ops@x.com"))
            .await
            .unwrap();
        let doc = store.get("config", "superusers").await.unwrap().unwrap();
        assert_eq!(doc["emails"], json!(["root@x.com", "ops@x.com"]));
    }

    #[tokio::test]
    async fn test_subscribe_sees_current_and_changes() {
        let store = MemoryStore::new();
        store.put("config", "superusers", json!({ "emails": [] })).await.unwrap();

        let mut rx = store.subscribe("config", "superusers").await.unwrap();
        assert!(rx.borrow().is_some());

        store
            .append("config", "superusers", "emails", json!("root@x.com"))
            .await
            .unwrap();
        rx.changed().await.unwrap();
        let doc = rx.borrow().clone().unwrap();
        assert_eq!(doc["emails"], json!(["root@x.com"]));
    }
}
