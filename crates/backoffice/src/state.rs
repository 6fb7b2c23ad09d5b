//! Application state shared across handlers.

use std::sync::Arc;

use loanmitra_access::{
    AccessResolver, AgentRepository, BranchRepository, DocumentStore, HierarchyResolver,
    IdentityHub, LeadRepository, RegistryRepository,
};

use crate::config::BackofficeConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackofficeConfig,
    identity: IdentityHub,
    resolver: AccessResolver,
    hierarchy: HierarchyResolver,
    agents: AgentRepository,
    leads: LeadRepository,
    branches: BranchRepository,
    registry: RegistryRepository,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: BackofficeConfig,
        store: Arc<dyn DocumentStore>,
        identity: IdentityHub,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                resolver: AccessResolver::new(Arc::clone(&store)),
                hierarchy: HierarchyResolver::new(Arc::clone(&store)),
                agents: AgentRepository::new(Arc::clone(&store)),
                leads: LeadRepository::new(Arc::clone(&store)),
                branches: BranchRepository::new(Arc::clone(&store)),
                registry: RegistryRepository::new(store),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BackofficeConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityHub {
        &self.inner.identity
    }

    #[must_use]
    pub fn resolver(&self) -> &AccessResolver {
        &self.inner.resolver
    }

    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyResolver {
        &self.inner.hierarchy
    }

    #[must_use]
    pub fn agents(&self) -> &AgentRepository {
        &self.inner.agents
    }

    #[must_use]
    pub fn leads(&self) -> &LeadRepository {
        &self.inner.leads
    }

    #[must_use]
    pub fn branches(&self) -> &BranchRepository {
        &self.inner.branches
    }

    #[must_use]
    pub fn registry(&self) -> &RegistryRepository {
        &self.inner.registry
    }
}
