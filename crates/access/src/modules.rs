//! Static backoffice module registry and visibility filter.

use loanmitra_core::{CapabilitySet, ModuleDescriptor};

/// Every backoffice module, in navigation order. Compiled in, never stored.
pub const MODULES: &[ModuleDescriptor] = &[
    ModuleDescriptor {
        id: "dashboard",
        label: "Dashboard",
        path: "/dashboard",
        capability_tag: "dashboard",
    },
    ModuleDescriptor {
        id: "leads",
        label: "Leads",
        path: "/leads",
        capability_tag: "leads",
    },
    ModuleDescriptor {
        id: "agents",
        label: "Agents",
        path: "/agents",
        capability_tag: "agents",
    },
    ModuleDescriptor {
        id: "branches",
        label: "Branches",
        path: "/branches",
        capability_tag: "branches",
    },
    ModuleDescriptor {
        id: "registry",
        label: "Access Registry",
        path: "/registry",
        capability_tag: "superadmin",
    },
    ModuleDescriptor {
        id: "profile",
        label: "My Profile",
        path: "/profile",
        capability_tag: "profile",
    },
];

/// Order-preserving subsequence of `all` granted by `capabilities`.
#[must_use]
pub fn visible_modules<'a>(
    all: &'a [ModuleDescriptor],
    capabilities: &CapabilitySet,
) -> Vec<&'a ModuleDescriptor> {
    all.iter()
        .filter(|m| capabilities.grants(m.capability_tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanmitra_core::StaffRole;

    #[test]
    fn test_wildcard_sees_everything_in_order() {
        let visible = visible_modules(MODULES, &CapabilitySet::all());
        let ids: Vec<&str> = visible.iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec!["dashboard", "leads", "agents", "branches", "registry", "profile"]
        );
    }

    #[test]
    fn test_agent_defaults_hide_admin_modules() {
        let caps = CapabilitySet::defaults_for(StaffRole::Agent);
        let ids: Vec<&str> = visible_modules(MODULES, &caps).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["dashboard", "leads", "profile"]);
    }

    #[test]
    fn test_empty_set_sees_nothing() {
        assert!(visible_modules(MODULES, &CapabilitySet::none()).is_empty());
    }
}
