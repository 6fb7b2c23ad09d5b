//! Resolution flows across the repositories, resolver and watch stream,
//! driven against the seeded fixture rather than per-module fakes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use loanmitra_access::store::MemoryStore;
use loanmitra_access::{
    AccessResolver, AccessWatch, AgentRepository, DevIdentityProvider, DocumentStore, GuardState,
    Identity, IdentityHub, MODULES, RegistryRepository, visible_modules,
};
use loanmitra_core::{AccessTier, AgentKey, Email};
use loanmitra_integration_tests::{fixtures, seeded_store};

fn identity(email: &str) -> Identity {
    Identity {
        verified_email: Email::parse(email).unwrap(),
        external_uid: "test".to_owned(),
    }
}

fn as_dyn(store: &Arc<MemoryStore>) -> Arc<dyn DocumentStore> {
    Arc::clone(store) as Arc<dyn DocumentStore>
}

#[tokio::test]
async fn test_consolidated_grant_overrides_legacy_roster_tier() {
    let store = seeded_store().await;
    let registry = RegistryRepository::new(as_dyn(&store));
    let resolver = AccessResolver::new(as_dyn(&store));

    let asha = identity(fixtures::AGENT);
    assert_eq!(resolver.resolve(Some(&asha)).await.tier, AccessTier::Agent);

    registry
        .grant(&asha.verified_email, AccessTier::Manager, None)
        .await
        .unwrap();
    assert_eq!(
        resolver.resolve(Some(&asha)).await.tier,
        AccessTier::Manager
    );
}

#[tokio::test]
async fn test_revocation_wins_over_every_legacy_registry() {
    let store = seeded_store().await;
    let registry = RegistryRepository::new(as_dyn(&store));
    let resolver = AccessResolver::new(as_dyn(&store));

    // ops@ holds access through the legacy allow-list only.
    let ops = identity(fixtures::ALLOWLISTED_ADMIN);
    assert_eq!(resolver.resolve(Some(&ops)).await.tier, AccessTier::Admin);

    // Grant and revoke through the consolidated registry. The allow-list
    // still contains the email, but it must not resurrect the access.
    registry
        .grant(&ops.verified_email, AccessTier::Admin, None)
        .await
        .unwrap();
    registry.revoke(&ops.verified_email).await.unwrap();

    assert_eq!(resolver.resolve(Some(&ops)).await.tier, AccessTier::Denied);
}

#[tokio::test]
async fn test_roster_deactivation_downgrades_to_denied() {
    let store = seeded_store().await;
    let agents = AgentRepository::new(as_dyn(&store));
    let resolver = AccessResolver::new(as_dyn(&store));

    agents.deactivate(&AgentKey::new("agent-asha")).await.unwrap();

    let resolution = resolver.resolve(Some(&identity(fixtures::AGENT))).await;
    // Denied, not Unauthenticated: the session itself is valid.
    assert_eq!(resolution.tier, AccessTier::Denied);
    assert!(!resolution.tier.is_authorized());
}

#[tokio::test]
async fn test_visible_modules_follow_resolved_capabilities() {
    let store = seeded_store().await;
    let resolver = AccessResolver::new(as_dyn(&store));

    let resolution = resolver.resolve(Some(&identity(fixtures::AGENT))).await;
    let ids: Vec<&str> = visible_modules(MODULES, &resolution.capabilities)
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["dashboard", "leads", "profile"]);

    let resolution = resolver.resolve(Some(&identity(fixtures::SUPERUSER))).await;
    let ids: Vec<&str> = visible_modules(MODULES, &resolution.capabilities)
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(
        ids,
        vec!["dashboard", "leads", "agents", "branches", "registry", "profile"]
    );
}

#[tokio::test]
async fn test_watch_tracks_sign_in_and_sign_out() {
    let store = seeded_store().await;
    let hub = IdentityHub::new(Some(Arc::new(DevIdentityProvider)));
    let resolver = Arc::new(AccessResolver::new(as_dyn(&store)));
    let watch = AccessWatch::spawn(&hub, resolver);
    let mut rx = watch.subscribe();

    rx.wait_for(|s| {
        matches!(
            s,
            GuardState::Ready { identity: None, resolution } if resolution.tier == AccessTier::Unauthenticated
        )
    })
    .await
    .unwrap();

    hub.sign_in(fixtures::MANAGER).await.unwrap();
    rx.wait_for(|s| {
        matches!(
            s,
            GuardState::Ready { identity: Some(_), resolution } if resolution.tier == AccessTier::Manager
        )
    })
    .await
    .unwrap();

    hub.sign_out();
    rx.wait_for(|s| {
        matches!(
            s,
            GuardState::Ready { identity: None, resolution } if resolution.tier == AccessTier::Unauthenticated
        )
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_watch_picks_up_registry_changes_on_next_sign_in() {
    let store = seeded_store().await;
    let registry = RegistryRepository::new(as_dyn(&store));
    let hub = IdentityHub::new(Some(Arc::new(DevIdentityProvider)));
    let resolver = Arc::new(AccessResolver::new(as_dyn(&store)));
    let watch = AccessWatch::spawn(&hub, resolver);
    let mut rx = watch.subscribe();

    hub.sign_in(fixtures::OUTSIDER).await.unwrap();
    rx.wait_for(|s| {
        matches!(
            s,
            GuardState::Ready { identity: Some(_), resolution } if resolution.tier == AccessTier::Denied
        )
    })
    .await
    .unwrap();

    registry
        .grant(
            &Email::parse(fixtures::OUTSIDER).unwrap(),
            AccessTier::Agent,
            None,
        )
        .await
        .unwrap();

    // The stream is identity-driven, so a fresh sign-in re-resolves.
    hub.sign_out();
    hub.sign_in(fixtures::OUTSIDER).await.unwrap();
    rx.wait_for(|s| {
        matches!(
            s,
            GuardState::Ready { identity: Some(_), resolution } if resolution.tier == AccessTier::Agent
        )
    })
    .await
    .unwrap();
}
