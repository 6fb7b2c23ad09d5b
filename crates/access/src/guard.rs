//! Route-guard decisions.
//!
//! Denial is an outcome here, never an error: HTTP middleware and the
//! navigation layer turn the decision into a redirect or a 403, and the
//! decision itself carries which message to show.

use loanmitra_core::Email;

use crate::resolver::TierResolution;

/// Why the caller is being sent to the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// No session at all.
    NotSignedIn,
    /// Valid session, but no registry grants access.
    NotAuthorized,
}

/// Terminal guard decision for a routing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Authorized,
    RedirectToLogin(LoginReason),
    /// Signed in and authorized, but lacking the capability for this
    /// specific section: send to the default landing page.
    RedirectToDefault,
}

/// Decide whether a caller may enter a route.
///
/// `required_capability` is `None` for routes any authorized staff member
/// may see. Admin and Superuser bypass capability checks entirely. On a
/// capability denial an audit event naming the capability and the caller
/// is emitted; denial already happened, the event is for the record.
#[must_use]
pub fn evaluate(
    resolution: &TierResolution,
    email: Option<&Email>,
    required_capability: Option<&str>,
) -> GuardDecision {
    if !resolution.tier.is_authorized() {
        let reason = if email.is_none() {
            LoginReason::NotSignedIn
        } else {
            LoginReason::NotAuthorized
        };
        return GuardDecision::RedirectToLogin(reason);
    }

    let Some(capability) = required_capability else {
        return GuardDecision::Authorized;
    };

    if resolution.tier.bypasses_capability_checks() || resolution.capabilities.grants(capability) {
        return GuardDecision::Authorized;
    }

    tracing::warn!(
        capability,
        email = email.map_or("<unknown>", Email::as_str),
        tier = %resolution.tier,
        "capability denied"
    );
    GuardDecision::RedirectToDefault
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use loanmitra_core::{AccessTier, CapabilitySet, StaffRole};

    fn resolution(tier: AccessTier, capabilities: CapabilitySet) -> TierResolution {
        TierResolution { tier, capabilities }
    }

    fn email() -> Email {
        Email::parse("asha@x.com").unwrap()
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let r = resolution(AccessTier::Unauthenticated, CapabilitySet::none());
        assert_eq!(
            evaluate(&r, None, None),
            GuardDecision::RedirectToLogin(LoginReason::NotSignedIn)
        );
    }

    #[test]
    fn test_denied_session_redirects_with_not_authorized() {
        let r = resolution(AccessTier::Denied, CapabilitySet::none());
        assert_eq!(
            evaluate(&r, Some(&email()), Some("leads")),
            GuardDecision::RedirectToLogin(LoginReason::NotAuthorized)
        );
    }

    #[test]
    fn test_authorized_without_capability_requirement() {
        let r = resolution(
            AccessTier::Agent,
            CapabilitySet::defaults_for(StaffRole::Agent),
        );
        assert_eq!(evaluate(&r, Some(&email()), None), GuardDecision::Authorized);
    }

    #[test]
    fn test_capability_match_and_mismatch() {
        let r = resolution(
            AccessTier::Agent,
            CapabilitySet::defaults_for(StaffRole::Agent),
        );
        assert_eq!(
            evaluate(&r, Some(&email()), Some("leads")),
            GuardDecision::Authorized
        );
        // Wrong section while signed in: default page, not login.
        assert_eq!(
            evaluate(&r, Some(&email()), Some("agents")),
            GuardDecision::RedirectToDefault
        );
    }

    #[test]
    fn test_admin_bypasses_capability_checks() {
        let r = resolution(AccessTier::Admin, CapabilitySet::none());
        assert_eq!(
            evaluate(&r, Some(&email()), Some("registry")),
            GuardDecision::Authorized
        );
    }

    #[test]
    fn test_wildcard_capability_grants_everything() {
        let r = resolution(AccessTier::Manager, CapabilitySet::all());
        assert_eq!(
            evaluate(&r, Some(&email()), Some("registry")),
            GuardDecision::Authorized
        );
    }
}
