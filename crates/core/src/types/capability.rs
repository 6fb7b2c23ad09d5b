//! Capability tags granting access to backoffice modules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tier::StaffRole;

/// Capability granting access to every module.
pub const WILDCARD: &str = "*";

/// Set of capability tags held by a caller.
///
/// Membership checks are wildcard-aware: a set containing [`WILDCARD`]
/// grants every capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<String>);

impl CapabilitySet {
    /// Empty set - grants nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Set containing only the wildcard.
    #[must_use]
    pub fn all() -> Self {
        let mut set = BTreeSet::new();
        set.insert(WILDCARD.to_owned());
        Self(set)
    }

    /// Default capabilities conferred by a roster role.
    ///
    /// Admin gets the wildcard; Manager and Agent get fixed module sets.
    /// Roster records may override these with an explicit `modules` array.
    #[must_use]
    pub fn defaults_for(role: StaffRole) -> Self {
        match role {
            StaffRole::Admin => Self::all(),
            StaffRole::Manager => ["dashboard", "leads", "agents", "profile"]
                .into_iter()
                .collect(),
            StaffRole::Agent => ["dashboard", "leads", "profile"].into_iter().collect(),
        }
    }

    /// Whether the set grants `capability`, directly or via the wildcard.
    #[must_use]
    pub fn grants(&self, capability: &str) -> bool {
        self.0.contains(WILDCARD) || self.0.contains(capability)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, capability: impl Into<String>) {
        self.0.insert(capability.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
