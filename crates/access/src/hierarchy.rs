//! Manager lookup over inconsistently keyed records.
//!
//! Roster data was seeded by several tools over time, so `manager_id` may
//! hold an agent store key, a human-facing agent code, or a store key into
//! the legacy admin collection. The probe chain absorbs that ambiguity so
//! callers never see it. Records written going forward carry a tagged
//! `manager_ref` instead, which skips the probing entirely.

use std::sync::Arc;

use loanmitra_core::{Agent, AgentKey, AdminKey, AdminUserRecord, ManagerRef};

use crate::repo::AgentRepository;
use crate::store::{DocumentStore, StoreError};

/// The resolved manager, tagged by which collection it came from.
#[derive(Debug, Clone)]
pub enum ManagerRecord {
    Agent { key: AgentKey, agent: Agent },
    Admin { key: AdminKey, record: AdminUserRecord },
}

impl ManagerRecord {
    /// Display name, uniform across both collections.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Agent { agent, .. } => Some(&agent.name),
            Self::Admin { record, .. } => record.name.as_deref(),
        }
    }
}

pub struct HierarchyResolver {
    agents: AgentRepository,
}

impl HierarchyResolver {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            agents: AgentRepository::new(store),
        }
    }

    /// Resolve an agent's manager.
    ///
    /// A tagged `manager_ref` is followed directly. Otherwise the legacy
    /// `manager_id` is probed, in order, as an agent store key, an agent
    /// code, then an admin store key; the first hit wins and later probes
    /// are not issued. Each probe is fail-closed: a store error is logged
    /// and treated as a miss for that probe only, and the remaining probes
    /// are still attempted. All probes missing is a valid terminal state,
    /// not an error: callers render it as "manager details not found".
    pub async fn resolve_manager(&self, agent: &Agent) -> Option<ManagerRecord> {
        if let Some(manager_ref) = &agent.manager_ref {
            return self.resolve_ref(manager_ref).await;
        }
        let manager_id = agent.manager_id.as_deref()?;

        let key = AgentKey::new(manager_id);
        if let Some(manager) = probe("agents", manager_id, self.agents.get(&key).await) {
            return Some(ManagerRecord::Agent { key, agent: manager });
        }

        if let Some((key, manager)) = probe(
            "agent_code",
            manager_id,
            self.agents.find_by_code(manager_id).await,
        ) {
            return Some(ManagerRecord::Agent { key, agent: manager });
        }

        let key = AdminKey::new(manager_id);
        probe("admins", manager_id, self.agents.admin_record(&key).await)
            .map(|record| ManagerRecord::Admin { key, record })
    }

    async fn resolve_ref(&self, manager_ref: &ManagerRef) -> Option<ManagerRecord> {
        match manager_ref {
            ManagerRef::AgentKey(value) => {
                let key = AgentKey::new(value.clone());
                probe("agents", value, self.agents.get(&key).await)
                    .map(|agent| ManagerRecord::Agent { key, agent })
            }
            ManagerRef::AgentCode(value) => {
                probe("agent_code", value, self.agents.find_by_code(value).await)
                    .map(|(key, agent)| ManagerRecord::Agent { key, agent })
            }
            ManagerRef::AdminKey(value) => {
                let key = AdminKey::new(value.clone());
                probe("admins", value, self.agents.admin_record(&key).await)
                    .map(|record| ManagerRecord::Admin { key, record })
            }
        }
    }
}

/// The fail-closed boundary: log the failure and carry on as "not found".
fn probe<T>(target: &str, manager_id: &str, result: Result<Option<T>, StoreError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%target, %manager_id, %error, "manager probe failed; treating as not found");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore, collections};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::watch;

    fn roster_agent(manager_id: Option<&str>) -> Agent {
        serde_json::from_value(json!({
            "agent_code": "AGT-104",
            "name": "Asha Verma",
            "email": "asha@x.com",
            "role": "agent",
            "manager_id": manager_id,
            "created_at": Utc::now(),
        }))
        .unwrap()
    }

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                collections::AGENTS,
                "agent-mgr",
                json!({
                    "agent_code": "MGR-001",
                    "name": "Meena Rao",
                    "email": "meena@x.com",
                    "role": "manager",
                    "created_at": Utc::now(),
                }),
            )
            .await
            .unwrap();
        store
            .put(
                collections::ADMINS,
                "adm-42",
                json!({ "email": "admin@x.com", "name": "Vikram Shah", "status": "active" }),
            )
            .await
            .unwrap();
        store
    }

    /// Counts reads per collection so short-circuit behavior is checkable.
    struct CountingStore {
        inner: Arc<MemoryStore>,
        gets: AtomicUsize,
        queries: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: Arc<MemoryStore>) -> Self {
            Self {
                inner,
                gets: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(collection, key).await
        }

        async fn find_eq(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<(String, Document)>, StoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_eq(collection, field, value).await
        }

        async fn list(
            &self,
            collection: &str,
            limit_to_last: Option<usize>,
        ) -> Result<Vec<(String, Document)>, StoreError> {
            self.inner.list(collection, limit_to_last).await
        }

        async fn put(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError> {
            self.inner.put(collection, key, doc).await
        }

        async fn update(
            &self,
            collection: &str,
            key: &str,
            partial: Document,
        ) -> Result<(), StoreError> {
            self.inner.update(collection, key, partial).await
        }

        async fn append(
            &self,
            collection: &str,
            key: &str,
            field: &str,
            value: Document,
        ) -> Result<(), StoreError> {
            self.inner.append(collection, key, field, value).await
        }

        async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
            self.inner.delete(collection, key).await
        }

        async fn subscribe(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<watch::Receiver<Option<Document>>, StoreError> {
            self.inner.subscribe(collection, key).await
        }
    }

    #[tokio::test]
    async fn test_direct_key_hit_skips_later_probes() {
        let counting = Arc::new(CountingStore::new(seeded().await));
        let resolver = HierarchyResolver::new(Arc::clone(&counting) as Arc<dyn DocumentStore>);

        let found = resolver
            .resolve_manager(&roster_agent(Some("agent-mgr")))
            .await
            .unwrap();
        assert_eq!(found.name(), Some("Meena Rao"));
        assert_eq!(counting.gets.load(Ordering::SeqCst), 1);
        assert_eq!(counting.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_agent_code_fallback() {
        let resolver = HierarchyResolver::new(seeded().await);
        let found = resolver
            .resolve_manager(&roster_agent(Some("MGR-001")))
            .await
            .unwrap();
        assert!(matches!(found, ManagerRecord::Agent { .. }));
        assert_eq!(found.name(), Some("Meena Rao"));
    }

    #[tokio::test]
    async fn test_cross_collection_admin_fallback() {
        let resolver = HierarchyResolver::new(seeded().await);
        let found = resolver
            .resolve_manager(&roster_agent(Some("adm-42")))
            .await
            .unwrap();
        assert!(matches!(found, ManagerRecord::Admin { .. }));
        assert_eq!(found.name(), Some("Vikram Shah"));
    }

    #[tokio::test]
    async fn test_all_probes_missing_is_ok_none() {
        let resolver = HierarchyResolver::new(seeded().await);
        assert!(
            resolver
                .resolve_manager(&roster_agent(Some("no-such-ref")))
                .await
                .is_none()
        );
        assert!(resolver.resolve_manager(&roster_agent(None)).await.is_none());
    }

    #[tokio::test]
    async fn test_tagged_ref_goes_straight_to_its_collection() {
        let counting = Arc::new(CountingStore::new(seeded().await));
        let resolver = HierarchyResolver::new(Arc::clone(&counting) as Arc<dyn DocumentStore>);

        let mut agent = roster_agent(None);
        agent.manager_ref = Some(ManagerRef::AdminKey("adm-42".to_owned()));
        let found = resolver.resolve_manager(&agent).await.unwrap();
        assert!(matches!(found, ManagerRecord::Admin { .. }));
        assert_eq!(counting.gets.load(Ordering::SeqCst), 1);
        assert_eq!(counting.queries.load(Ordering::SeqCst), 0);
    }

    /// Errors reads of one collection, delegating the rest.
    struct OutageStore {
        inner: Arc<MemoryStore>,
        down: &'static str,
    }

    impl OutageStore {
        fn fail(&self, collection: &str) -> Result<(), StoreError> {
            if collection == self.down {
                return Err(StoreError::Unavailable("injected outage".to_owned()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for OutageStore {
        async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
            self.fail(collection)?;
            self.inner.get(collection, key).await
        }

        async fn find_eq(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<(String, Document)>, StoreError> {
            self.fail(collection)?;
            self.inner.find_eq(collection, field, value).await
        }

        async fn list(
            &self,
            collection: &str,
            limit_to_last: Option<usize>,
        ) -> Result<Vec<(String, Document)>, StoreError> {
            self.fail(collection)?;
            self.inner.list(collection, limit_to_last).await
        }

        async fn put(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError> {
            self.inner.put(collection, key, doc).await
        }

        async fn update(
            &self,
            collection: &str,
            key: &str,
            partial: Document,
        ) -> Result<(), StoreError> {
            self.inner.update(collection, key, partial).await
        }

        async fn append(
            &self,
            collection: &str,
            key: &str,
            field: &str,
            value: Document,
        ) -> Result<(), StoreError> {
            self.inner.append(collection, key, field, value).await
        }

        async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
            self.inner.delete(collection, key).await
        }

        async fn subscribe(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<watch::Receiver<Option<Document>>, StoreError> {
            self.inner.subscribe(collection, key).await
        }
    }

    #[tokio::test]
    async fn test_failed_probe_falls_through_to_later_probes() {
        // The roster collection is down, so the agent-key and agent-code
        // probes both error; the admin probe must still be issued and win.
        let store = Arc::new(OutageStore {
            inner: seeded().await,
            down: collections::AGENTS,
        });
        let resolver = HierarchyResolver::new(store as Arc<dyn DocumentStore>);

        let found = resolver
            .resolve_manager(&roster_agent(Some("adm-42")))
            .await
            .unwrap();
        assert!(matches!(found, ManagerRecord::Admin { .. }));
        assert_eq!(found.name(), Some("Vikram Shah"));
    }

    #[tokio::test]
    async fn test_all_probes_failing_is_none() {
        let store = Arc::new(OutageStore {
            inner: seeded().await,
            down: collections::ADMINS,
        });
        let resolver = HierarchyResolver::new(Arc::new(OutageStore {
            inner: Arc::new(MemoryStore::new()),
            down: collections::AGENTS,
        }) as Arc<dyn DocumentStore>);
        assert!(
            resolver
                .resolve_manager(&roster_agent(Some("adm-42")))
                .await
                .is_none()
        );

        // A tagged ref whose collection errors also degrades to "not found".
        let resolver = HierarchyResolver::new(store as Arc<dyn DocumentStore>);
        let mut agent = roster_agent(None);
        agent.manager_ref = Some(ManagerRef::AdminKey("adm-42".to_owned()));
        assert!(resolver.resolve_manager(&agent).await.is_none());
    }
}
