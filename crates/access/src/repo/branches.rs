//! Branch office repository. Plain CRUD.

use std::sync::Arc;

use loanmitra_core::{Branch, BranchKey};
use uuid::Uuid;

use crate::store::{DocumentStore, StoreError, collections, decode};

#[derive(Clone)]
pub struct BranchRepository {
    store: Arc<dyn DocumentStore>,
}

impl BranchRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn get(&self, key: &BranchKey) -> Result<Option<Branch>, StoreError> {
        self.store
            .get(collections::BRANCHES, key.as_str())
            .await?
            .map(|doc| decode(collections::BRANCHES, key.as_str(), doc))
            .transpose()
    }

    /// All branches, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn list(&self) -> Result<Vec<(BranchKey, Branch)>, StoreError> {
        self.store
            .list(collections::BRANCHES, None)
            .await?
            .into_iter()
            .map(|(key, doc)| {
                let branch = decode(collections::BRANCHES, &key, doc)?;
                Ok((BranchKey::new(key), branch))
            })
            .collect()
    }

    /// Active branches only, for the public site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn list_active(&self) -> Result<Vec<(BranchKey, Branch)>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|(_, b)| b.status.is_active())
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub async fn create(&self, branch: &Branch) -> Result<BranchKey, StoreError> {
        let key = BranchKey::new(format!("branch-{}", Uuid::new_v4()));
        let doc = serde_json::to_value(branch).map_err(|source| StoreError::Malformed {
            path: format!("{}/{}", collections::BRANCHES, key.as_str()),
            source,
        })?;
        self.store
            .put(collections::BRANCHES, key.as_str(), doc)
            .await?;
        Ok(key)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn update(
        &self,
        key: &BranchKey,
        partial: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.store
            .update(collections::BRANCHES, key.as_str(), partial)
            .await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn deactivate(&self, key: &BranchKey) -> Result<(), StoreError> {
        self.update(key, serde_json::json!({ "status": "inactive" }))
            .await
    }
}
