//! Application state shared across handlers.

use std::sync::Arc;

use loanmitra_access::{BranchRepository, DocumentStore, LeadRepository};

use crate::config::SiteConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    leads: LeadRepository,
    branches: BranchRepository,
}

impl AppState {
    #[must_use]
    pub fn new(config: SiteConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                leads: LeadRepository::new(Arc::clone(&store)),
                branches: BranchRepository::new(store),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn leads(&self) -> &LeadRepository {
        &self.inner.leads
    }

    #[must_use]
    pub fn branches(&self) -> &BranchRepository {
        &self.inner.branches
    }
}
