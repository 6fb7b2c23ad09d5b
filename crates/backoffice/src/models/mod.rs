//! Session models for the backoffice.

use serde::{Deserialize, Serialize};

use loanmitra_core::{AccessTier, CapabilitySet, Email};

/// Session keys used by the backoffice.
pub mod session_keys {
    /// Key for the current staff member.
    pub const CURRENT_STAFF: &str = "current_staff";
}

/// The signed-in staff member, stored in the session after login.
///
/// The tier and capability set are resolved once at sign-in; staff must
/// sign in again to pick up registry changes, which keeps every request
/// from re-reading four registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    pub email: Email,
    pub tier: AccessTier,
    pub capabilities: CapabilitySet,
}

impl CurrentStaff {
    /// Whether this staff member may use a module, honoring the admin
    /// bypass.
    #[must_use]
    pub fn can_access(&self, capability: &str) -> bool {
        self.tier.bypasses_capability_checks() || self.capabilities.grants(capability)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use loanmitra_core::StaffRole;

    #[test]
    fn test_can_access_respects_bypass_and_grants() {
        let agent = CurrentStaff {
            email: Email::parse("asha@x.com").unwrap(),
            tier: AccessTier::Agent,
            capabilities: CapabilitySet::defaults_for(StaffRole::Agent),
        };
        assert!(agent.can_access("leads"));
        assert!(!agent.can_access("registry"));

        let admin = CurrentStaff {
            email: Email::parse("ops@x.com").unwrap(),
            tier: AccessTier::Admin,
            capabilities: CapabilitySet::none(),
        };
        assert!(admin.can_access("registry"));
    }
}
