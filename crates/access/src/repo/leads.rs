//! Lead repository.
//!
//! Keys are `{millis:013}-{uuid}` so lexicographic key order matches
//! submission order, which the in-memory store relies on for range reads.

use std::sync::Arc;

use chrono::Utc;
use loanmitra_core::{Lead, LeadCategory, LeadKey, LeadStatus};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::{DocumentStore, StoreError, collections, decode};

#[derive(Clone)]
pub struct LeadRepository {
    store: Arc<dyn DocumentStore>,
}

impl LeadRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a visitor submission.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub async fn submit(
        &self,
        category: LeadCategory,
        data: Map<String, Value>,
    ) -> Result<LeadKey, StoreError> {
        let now = Utc::now();
        let lead = Lead {
            category,
            created_at: now,
            data,
            status: LeadStatus::New,
            note: None,
        };
        let key = LeadKey::new(format!(
            "{:013}-{}",
            now.timestamp_millis(),
            Uuid::new_v4()
        ));
        let doc = serde_json::to_value(&lead).map_err(|source| StoreError::Malformed {
            path: format!("{}/{}", collections::LEADS, key.as_str()),
            source,
        })?;
        self.store.put(collections::LEADS, key.as_str(), doc).await?;
        Ok(key)
    }

    /// The newest `n` leads, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn recent(&self, n: usize) -> Result<Vec<(LeadKey, Lead)>, StoreError> {
        self.store
            .list(collections::LEADS, Some(n))
            .await?
            .into_iter()
            .map(|(key, doc)| {
                let lead = decode(collections::LEADS, &key, doc)?;
                Ok((LeadKey::new(key), lead))
            })
            .collect()
    }

    /// Every lead, oldest first. Used by the CSV export.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn all(&self) -> Result<Vec<(LeadKey, Lead)>, StoreError> {
        self.store
            .list(collections::LEADS, None)
            .await?
            .into_iter()
            .map(|(key, doc)| {
                let lead = decode(collections::LEADS, &key, doc)?;
                Ok((LeadKey::new(key), lead))
            })
            .collect()
    }

    /// Point read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn get(&self, key: &LeadKey) -> Result<Option<Lead>, StoreError> {
        self.store
            .get(collections::LEADS, key.as_str())
            .await?
            .map(|doc| decode(collections::LEADS, key.as_str(), doc))
            .transpose()
    }

    /// Advance the working status, optionally replacing the staff note.
    /// Leads are never deleted by staff flows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn set_status(
        &self,
        key: &LeadKey,
        status: LeadStatus,
        note: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut partial = serde_json::json!({ "status": status });
        if let (Some(obj), Some(note)) = (partial.as_object_mut(), note) {
            obj.insert("note".to_owned(), Value::String(note.to_owned()));
        }
        self.store
            .update(collections::LEADS, key.as_str(), partial)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn form(name: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("name".to_owned(), json!(name));
        data.insert("amount".to_owned(), json!("250000"));
        data
    }

    #[tokio::test]
    async fn test_submit_and_recent_ordering() {
        let repo = LeadRepository::new(Arc::new(MemoryStore::new()));
        for name in ["first", "second", "third"] {
            repo.submit(LeadCategory::Loan, form(name)).await.unwrap();
            // Keys are millisecond-prefixed; keep submissions in distinct
            // milliseconds so the order assertion is deterministic.
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let recent = repo.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        let names: Vec<&str> = recent
            .iter()
            .filter_map(|(_, l)| l.data.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["second", "third"]);
    }

    #[tokio::test]
    async fn test_status_update_preserves_submission_data() {
        let repo = LeadRepository::new(Arc::new(MemoryStore::new()));
        let key = repo.submit(LeadCategory::Contact, form("x")).await.unwrap();

        repo.set_status(&key, LeadStatus::Contacted, Some("called back"))
            .await
            .unwrap();
        let lead = repo.get(&key).await.unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.note.as_deref(), Some("called back"));
        assert_eq!(lead.data.get("amount"), Some(&json!("250000")));
    }
}
