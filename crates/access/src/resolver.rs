//! Authorization resolver: verified email to [`AccessTier`].
//!
//! The registries are independent stores that can disagree; resolution
//! checks them in fixed priority order and short-circuits on the first
//! positive match, so the caller always receives the highest confirmed
//! tier. Every read is fail-closed: a store error is logged and treated as
//! "not found" for that registry only, and lower-priority registries are
//! still consulted.

use std::sync::Arc;

use loanmitra_core::{AccessTier, CapabilitySet};

use crate::identity::Identity;
use crate::repo::{AgentRepository, RegistryRepository};
use crate::store::{DocumentStore, StoreError};

/// The resolver's full answer: the tier plus the capability set derived
/// from it, so guard checks need no second lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierResolution {
    pub tier: AccessTier,
    pub capabilities: CapabilitySet,
}

impl TierResolution {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            tier: AccessTier::Unauthenticated,
            capabilities: CapabilitySet::none(),
        }
    }
}

pub struct AccessResolver {
    registry: RegistryRepository,
    agents: AgentRepository,
}

impl AccessResolver {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            registry: RegistryRepository::new(Arc::clone(&store)),
            agents: AgentRepository::new(store),
        }
    }

    /// Resolve the tier for an optional identity.
    ///
    /// Priority order:
    ///
    /// 1. no identity -> `Unauthenticated`
    /// 2. consolidated registry entry -> its tier
    /// 3. legacy superuser registry -> `Superuser`
    /// 4. legacy admin allow-list -> `Admin`
    /// 5. active legacy admin-user document -> `Admin`
    /// 6. active agent-roster record -> tier from its role
    /// 7. otherwise -> `Denied` (valid session, no grant)
    ///
    /// Infallible by construction; store failures degrade to `Denied`.
    pub async fn resolve(&self, identity: Option<&Identity>) -> TierResolution {
        let Some(identity) = identity else {
            return TierResolution::unauthenticated();
        };
        let email = &identity.verified_email;

        if let Some(entry) = check(
            "authorization_registry",
            email.as_str(),
            self.registry.consolidated_lookup(email).await,
        )
        .flatten()
        {
            // A revoked consolidated entry is an explicit denial; the
            // legacy registries must not resurrect the grant.
            if entry.status.is_active() {
                return with_defaults(entry.tier);
            }
            return TierResolution {
                tier: AccessTier::Denied,
                capabilities: CapabilitySet::none(),
            };
        }

        if check(
            "superusers",
            email.as_str(),
            self.registry.is_superuser(email).await,
        )
        .unwrap_or(false)
        {
            return with_defaults(AccessTier::Superuser);
        }

        if check(
            "admin_allowlist",
            email.as_str(),
            self.registry.is_allowlisted_admin(email).await,
        )
        .unwrap_or(false)
        {
            return with_defaults(AccessTier::Admin);
        }

        if check(
            "admin_users",
            email.as_str(),
            self.registry.active_admin_user(email).await,
        )
        .flatten()
        .is_some()
        {
            return with_defaults(AccessTier::Admin);
        }

        if let Some((_, agent)) = check(
            "agents",
            email.as_str(),
            self.agents.find_active_by_email(email).await,
        )
        .flatten()
        {
            let tier = agent.role.tier();
            // Explicit per-agent module grants override the role defaults.
            let capabilities = if tier.bypasses_capability_checks() {
                CapabilitySet::all()
            } else if let Some(modules) = agent.modules {
                modules.into_iter().collect()
            } else {
                CapabilitySet::defaults_for(agent.role)
            };
            return TierResolution { tier, capabilities };
        }

        TierResolution {
            tier: AccessTier::Denied,
            capabilities: CapabilitySet::none(),
        }
    }
}

fn with_defaults(tier: AccessTier) -> TierResolution {
    let capabilities = match tier {
        t if t.bypasses_capability_checks() => CapabilitySet::all(),
        AccessTier::Manager => CapabilitySet::defaults_for(loanmitra_core::StaffRole::Manager),
        AccessTier::Agent => CapabilitySet::defaults_for(loanmitra_core::StaffRole::Agent),
        _ => CapabilitySet::none(),
    };
    TierResolution { tier, capabilities }
}

/// The fail-closed boundary: log the failure and carry on as "not found".
fn check<T>(registry: &str, email: &str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(%registry, %email, %error, "registry read failed; treating as not found");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{Document, DocumentStore, MemoryStore, collections, config_keys};
    use async_trait::async_trait;
    use chrono::Utc;
    use loanmitra_core::Email;
    use serde_json::json;
    use tokio::sync::watch;

    fn identity(email: &str) -> Identity {
        Identity {
            verified_email: Email::parse(email).unwrap(),
            external_uid: "uid".to_owned(),
        }
    }

    fn agent_doc(email: &str, role: &str) -> Document {
        json!({
            "agent_code": "AGT-104",
            "name": "Asha Verma",
            "email": email,
            "role": role,
            "status": "active",
            "created_at": Utc::now(),
        })
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                collections::CONFIG,
                config_keys::SUPERUSERS,
                json!({ "emails": ["root@x.com", "both@x.com"] }),
            )
            .await
            .unwrap();
        store
            .put(
                collections::CONFIG,
                config_keys::ADMIN_ALLOWLIST,
                json!({ "admin_emails": ["ops@x.com", "both@x.com"] }),
            )
            .await
            .unwrap();
        store
            .put(
                collections::ADMIN_USERS,
                "adm-1",
                json!({ "email": "legacy@x.com", "status": "active" }),
            )
            .await
            .unwrap();
        store
            .put(collections::AGENTS, "agent-1", agent_doc("asha@x.com", "agent"))
            .await
            .unwrap();
        store
            .put(collections::AGENTS, "agent-2", agent_doc("meena@x.com", "manager"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_no_identity_is_unauthenticated() {
        let resolver = AccessResolver::new(seeded_store().await);
        let r = resolver.resolve(None).await;
        assert_eq!(r.tier, AccessTier::Unauthenticated);
        assert!(!r.capabilities.grants("dashboard"));
    }

    #[tokio::test]
    async fn test_priority_order_across_registries() {
        let resolver = AccessResolver::new(seeded_store().await);
        assert_eq!(
            resolver.resolve(Some(&identity("root@x.com"))).await.tier,
            AccessTier::Superuser
        );
        assert_eq!(
            resolver.resolve(Some(&identity("ops@x.com"))).await.tier,
            AccessTier::Admin
        );
        assert_eq!(
            resolver.resolve(Some(&identity("legacy@x.com"))).await.tier,
            AccessTier::Admin
        );
        assert_eq!(
            resolver.resolve(Some(&identity("asha@x.com"))).await.tier,
            AccessTier::Agent
        );
        assert_eq!(
            resolver.resolve(Some(&identity("meena@x.com"))).await.tier,
            AccessTier::Manager
        );
    }

    #[tokio::test]
    async fn test_superuser_wins_over_allowlist() {
        // both@x.com appears in both legacy registries; the higher tier wins.
        let resolver = AccessResolver::new(seeded_store().await);
        assert_eq!(
            resolver.resolve(Some(&identity("both@x.com"))).await.tier,
            AccessTier::Superuser
        );
    }

    #[tokio::test]
    async fn test_consolidated_registry_is_consulted_first() {
        let store = seeded_store().await;
        store
            .put(
                collections::AUTHORIZATION,
                "asha@x.com",
                json!({
                    "email": "asha@x.com",
                    "tier": "manager",
                    "status": "active",
                    "granted_at": Utc::now(),
                }),
            )
            .await
            .unwrap();
        let resolver = AccessResolver::new(store);
        // The roster says agent; the consolidated grant says manager.
        assert_eq!(
            resolver.resolve(Some(&identity("asha@x.com"))).await.tier,
            AccessTier::Manager
        );
    }

    #[tokio::test]
    async fn test_revoked_consolidated_entry_overrides_legacy_grant() {
        let store = seeded_store().await;
        // root@x.com is still in the legacy superuser array, but the
        // consolidated entry was revoked.
        store
            .put(
                collections::AUTHORIZATION,
                "root@x.com",
                json!({
                    "email": "root@x.com",
                    "tier": "superuser",
                    "status": "inactive",
                    "granted_at": Utc::now(),
                }),
            )
            .await
            .unwrap();
        let resolver = AccessResolver::new(store);
        assert_eq!(
            resolver.resolve(Some(&identity("root@x.com"))).await.tier,
            AccessTier::Denied
        );
    }

    #[tokio::test]
    async fn test_unregistered_session_is_denied_not_unauthenticated() {
        let resolver = AccessResolver::new(seeded_store().await);
        let r = resolver.resolve(Some(&identity("stranger@x.com"))).await;
        assert_eq!(r.tier, AccessTier::Denied);
        assert!(!r.tier.is_authorized());
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = AccessResolver::new(seeded_store().await);
        let id = identity("meena@x.com");
        let first = resolver.resolve(Some(&id)).await;
        let second = resolver.resolve(Some(&id)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_agent_module_override_replaces_role_defaults() {
        let store = Arc::new(MemoryStore::new());
        let mut doc = agent_doc("asha@x.com", "agent");
        doc["modules"] = json!(["dashboard", "branches"]);
        store.put(collections::AGENTS, "agent-1", doc).await.unwrap();

        let resolver = AccessResolver::new(store);
        let r = resolver.resolve(Some(&identity("asha@x.com"))).await;
        assert!(r.capabilities.grants("branches"));
        assert!(!r.capabilities.grants("leads"));
    }

    /// Store whose reads fail for chosen collections.
    struct FlakyStore {
        inner: Arc<MemoryStore>,
        failing: Vec<&'static str>,
    }

    impl FlakyStore {
        fn fails_for(&self, collection: &str) -> Result<(), crate::store::StoreError> {
            if self.failing.contains(&collection) {
                Err(crate::store::StoreError::Unavailable(
                    "injected failure".to_owned(),
                ))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn get(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<Option<Document>, crate::store::StoreError> {
            self.fails_for(collection)?;
            self.inner.get(collection, key).await
        }

        async fn find_eq(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<(String, Document)>, crate::store::StoreError> {
            self.fails_for(collection)?;
            self.inner.find_eq(collection, field, value).await
        }

        async fn list(
            &self,
            collection: &str,
            limit_to_last: Option<usize>,
        ) -> Result<Vec<(String, Document)>, crate::store::StoreError> {
            self.fails_for(collection)?;
            self.inner.list(collection, limit_to_last).await
        }

        async fn put(
            &self,
            collection: &str,
            key: &str,
            doc: Document,
        ) -> Result<(), crate::store::StoreError> {
            self.inner.put(collection, key, doc).await
        }

        async fn update(
            &self,
            collection: &str,
            key: &str,
            partial: Document,
        ) -> Result<(), crate::store::StoreError> {
            self.inner.update(collection, key, partial).await
        }

        async fn append(
            &self,
            collection: &str,
            key: &str,
            field: &str,
            value: Document,
        ) -> Result<(), crate::store::StoreError> {
            self.inner.append(collection, key, field, value).await
        }

        async fn delete(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<(), crate::store::StoreError> {
            self.inner.delete(collection, key).await
        }

        async fn subscribe(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<watch::Receiver<Option<Document>>, crate::store::StoreError> {
            self.inner.subscribe(collection, key).await
        }
    }

    #[tokio::test]
    async fn test_failed_registry_falls_through_to_lower_priority() {
        // config reads fail, so the superuser check cannot confirm; the
        // roster still can, and must not be skipped.
        let inner = seeded_store().await;
        let store = Arc::new(FlakyStore {
            inner,
            failing: vec![collections::CONFIG],
        });
        let resolver = AccessResolver::new(store);
        assert_eq!(
            resolver.resolve(Some(&identity("asha@x.com"))).await.tier,
            AccessTier::Agent
        );
        // root@x.com only exists in the failing registry: denied, not granted.
        assert_eq!(
            resolver.resolve(Some(&identity("root@x.com"))).await.tier,
            AccessTier::Denied
        );
    }

    #[tokio::test]
    async fn test_all_registries_failing_denies() {
        let inner = seeded_store().await;
        let store = Arc::new(FlakyStore {
            inner,
            failing: vec![
                collections::AUTHORIZATION,
                collections::CONFIG,
                collections::ADMIN_USERS,
                collections::AGENTS,
            ],
        });
        let resolver = AccessResolver::new(store);
        let r = resolver.resolve(Some(&identity("root@x.com"))).await;
        assert_eq!(r.tier, AccessTier::Denied);
        assert!(!r.tier.is_authorized());
    }
}
