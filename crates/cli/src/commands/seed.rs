//! Registry seeding.

use std::sync::Arc;

use loanmitra_core::{AccessTier, Email};
use loanmitra_access::{DocumentStore, RegistryRepository};

use super::{CommandError, connect_default};

/// Seed a superuser email.
///
/// Writes the consolidated entry and appends to the legacy array so both
/// resolver paths agree immediately.
pub async fn superuser(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let store = connect_default().await?;
    let registry = RegistryRepository::new(Arc::new(store) as Arc<dyn DocumentStore>);

    registry.grant(&email, AccessTier::Superuser, None).await?;
    registry.add_superuser(&email).await?;

    tracing::info!(%email, "superuser seeded");
    Ok(())
}
