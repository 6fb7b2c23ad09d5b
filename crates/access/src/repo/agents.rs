//! Agent roster repository.

use std::sync::Arc;

use loanmitra_core::{Agent, AgentKey, AdminKey, AdminUserRecord, Email};
use uuid::Uuid;

use crate::store::{DocumentStore, StoreError, collections, decode};

#[derive(Clone)]
pub struct AgentRepository {
    store: Arc<dyn DocumentStore>,
}

impl AgentRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Point read by store key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn get(&self, key: &AgentKey) -> Result<Option<Agent>, StoreError> {
        self.store
            .get(collections::AGENTS, key.as_str())
            .await?
            .map(|doc| decode(collections::AGENTS, key.as_str(), doc))
            .transpose()
    }

    /// Lookup by the human-facing agent code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<(AgentKey, Agent)>, StoreError> {
        let hits = self
            .store
            .find_eq(collections::AGENTS, "agent_code", code)
            .await?;
        hits.into_iter()
            .next()
            .map(|(key, doc)| {
                let agent = decode(collections::AGENTS, &key, doc)?;
                Ok((AgentKey::new(key), agent))
            })
            .transpose()
    }

    /// Active roster record for an email, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn find_active_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(AgentKey, Agent)>, StoreError> {
        let hits = self
            .store
            .find_eq(collections::AGENTS, "email", email.as_str())
            .await?;
        for (key, doc) in hits {
            let agent: Agent = decode(collections::AGENTS, &key, doc)?;
            if agent.status.is_active() {
                return Ok(Some((AgentKey::new(key), agent)));
            }
        }
        Ok(None)
    }

    /// Point read into the legacy admin collection (used by the hierarchy
    /// resolver's cross-collection probe).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn admin_record(
        &self,
        key: &AdminKey,
    ) -> Result<Option<AdminUserRecord>, StoreError> {
        self.store
            .get(collections::ADMINS, key.as_str())
            .await?
            .map(|doc| decode(collections::ADMINS, key.as_str(), doc))
            .transpose()
    }

    /// Full roster, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn list(&self) -> Result<Vec<(AgentKey, Agent)>, StoreError> {
        self.store
            .list(collections::AGENTS, None)
            .await?
            .into_iter()
            .map(|(key, doc)| {
                let agent = decode(collections::AGENTS, &key, doc)?;
                Ok((AgentKey::new(key), agent))
            })
            .collect()
    }

    /// Create a roster record under a fresh store key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub async fn create(&self, agent: &Agent) -> Result<AgentKey, StoreError> {
        let key = AgentKey::new(format!("agent-{}", Uuid::new_v4()));
        let doc = serde_json::to_value(agent).map_err(|source| StoreError::Malformed {
            path: format!("{}/{}", collections::AGENTS, key.as_str()),
            source,
        })?;
        self.store.put(collections::AGENTS, key.as_str(), doc).await?;
        Ok(key)
    }

    /// Shallow-merge updated fields into a roster record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn update(&self, key: &AgentKey, partial: serde_json::Value) -> Result<(), StoreError> {
        self.store
            .update(collections::AGENTS, key.as_str(), partial)
            .await
    }

    /// Flip a roster record to inactive. Roster records are never
    /// hard-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn deactivate(&self, key: &AgentKey) -> Result<(), StoreError> {
        self.update(key, serde_json::json!({ "status": "inactive" }))
            .await
    }
}
