//! Fold the legacy registries into the consolidated registry.
//!
//! Reads the superuser array, the admin allow-list and the `admin_users`
//! collection, and writes one consolidated entry per email at the highest
//! tier any legacy source confers. Existing consolidated entries are left
//! untouched, so the command is safe to re-run and never downgrades a
//! manual grant.

use std::collections::BTreeMap;
use std::sync::Arc;

use loanmitra_core::{AccessTier, Email};
use loanmitra_access::{DocumentStore, RegistryRepository};

use super::{CommandError, connect_default};

pub async fn run() -> Result<(), CommandError> {
    let store = Arc::new(connect_default().await?) as Arc<dyn DocumentStore>;
    let registry = RegistryRepository::new(store);

    // Highest legacy tier per email.
    let mut tiers: BTreeMap<String, AccessTier> = BTreeMap::new();
    for email in registry.superuser_emails().await? {
        tiers.insert(email, AccessTier::Superuser);
    }
    for email in registry.allowlisted_admin_emails().await? {
        let entry = tiers.entry(email).or_insert(AccessTier::Admin);
        *entry = (*entry).max(AccessTier::Admin);
    }
    for (_, record) in registry.admin_users().await? {
        if record.status.is_active() {
            let entry = tiers
                .entry(record.email.as_str().to_owned())
                .or_insert(AccessTier::Admin);
            *entry = (*entry).max(AccessTier::Admin);
        }
    }

    let mut written = 0usize;
    let mut skipped = 0usize;
    for (email, tier) in tiers {
        let email = match Email::parse(&email) {
            Ok(email) => email,
            Err(error) => {
                tracing::warn!(%email, %error, "legacy registry entry is not a valid email; skipping");
                skipped += 1;
                continue;
            }
        };
        if registry.consolidated_lookup(&email).await?.is_some() {
            skipped += 1;
            continue;
        }
        registry.grant(&email, tier, None).await?;
        written += 1;
    }

    tracing::info!(written, skipped, "registry consolidation complete");
    Ok(())
}
