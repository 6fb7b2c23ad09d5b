//! Authorization tiers, staff roles and record statuses.

use serde::{Deserialize, Serialize};

/// Ordered authorization level of a caller.
///
/// The derived ordering is load-bearing: the authorization resolver must
/// return the highest tier confirmed by any registry, and guard checks
/// compare tiers with `>=`.
///
/// `Denied` is "valid session, no matching registry entry" - kept distinct
/// from `Unauthenticated` so callers can redirect with the right message
/// (sign in vs. account not authorized).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    #[default]
    Unauthenticated,
    Denied,
    Agent,
    Manager,
    Admin,
    Superuser,
}

impl AccessTier {
    /// Whether the caller may enter the backoffice at all.
    #[must_use]
    pub fn is_authorized(self) -> bool {
        self >= Self::Agent
    }

    /// Admin and Superuser skip per-module capability checks.
    #[must_use]
    pub fn bypasses_capability_checks(self) -> bool {
        self >= Self::Admin
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Denied => write!(f, "denied"),
            Self::Agent => write!(f, "agent"),
            Self::Manager => write!(f, "manager"),
            Self::Admin => write!(f, "admin"),
            Self::Superuser => write!(f, "superuser"),
        }
    }
}

impl std::str::FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unauthenticated" => Ok(Self::Unauthenticated),
            "denied" => Ok(Self::Denied),
            "agent" => Ok(Self::Agent),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "superuser" => Ok(Self::Superuser),
            _ => Err(format!("invalid access tier: {s}")),
        }
    }
}

/// Role stored on an agent-roster record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Manager,
    Agent,
}

impl StaffRole {
    /// The tier an active roster record with this role confers.
    #[must_use]
    pub const fn tier(self) -> AccessTier {
        match self {
            Self::Admin => AccessTier::Admin,
            Self::Manager => AccessTier::Manager,
            Self::Agent => AccessTier::Agent,
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "agent" => Ok(Self::Agent),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}

/// Activation status for personnel, branch and registry records.
///
/// Records are never hard-deleted in normal flows; deactivation flips this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Category of a submitted lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadCategory {
    Loan,
    Product,
    Contact,
    Career,
    CreditCheck,
}

impl std::fmt::Display for LeadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loan => write!(f, "loan"),
            Self::Product => write!(f, "product"),
            Self::Contact => write!(f, "contact"),
            Self::Career => write!(f, "career"),
            Self::CreditCheck => write!(f, "credit_check"),
        }
    }
}

impl std::str::FromStr for LeadCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loan" => Ok(Self::Loan),
            "product" => Ok(Self::Product),
            "contact" => Ok(Self::Contact),
            "career" => Ok(Self::Career),
            "credit_check" => Ok(Self::CreditCheck),
            _ => Err(format!("invalid lead category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_is_strict() {
        assert!(AccessTier::Unauthenticated < AccessTier::Denied);
        assert!(AccessTier::Denied < AccessTier::Agent);
        assert!(AccessTier::Agent < AccessTier::Manager);
        assert!(AccessTier::Manager < AccessTier::Admin);
        assert!(AccessTier::Admin < AccessTier::Superuser);
    }

    #[test]
    fn test_authorized_boundary() {
        assert!(!AccessTier::Unauthenticated.is_authorized());
        assert!(!AccessTier::Denied.is_authorized());
        assert!(AccessTier::Agent.is_authorized());
        assert!(AccessTier::Superuser.is_authorized());
    }

    #[test]
    fn test_capability_bypass_boundary() {
        assert!(!AccessTier::Manager.bypasses_capability_checks());
        assert!(AccessTier::Admin.bypasses_capability_checks());
        assert!(AccessTier::Superuser.bypasses_capability_checks());
    }

    #[test]
    fn test_role_to_tier() {
        assert_eq!(StaffRole::Admin.tier(), AccessTier::Admin);
        assert_eq!(StaffRole::Manager.tier(), AccessTier::Manager);
        assert_eq!(StaffRole::Agent.tier(), AccessTier::Agent);
    }

    #[test]
    fn test_tier_roundtrip() {
        for tier in [
            AccessTier::Unauthenticated,
            AccessTier::Denied,
            AccessTier::Agent,
            AccessTier::Manager,
            AccessTier::Admin,
            AccessTier::Superuser,
        ] {
            let parsed: AccessTier = tier.to_string().parse().unwrap();
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "credit_check".parse::<LeadCategory>().unwrap(),
            LeadCategory::CreditCheck
        );
        assert!("mortgage".parse::<LeadCategory>().is_err());
    }
}
