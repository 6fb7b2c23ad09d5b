//! Re-key `admin_users` documents by email.
//!
//! Early seed tooling keyed admin documents by opaque generated keys,
//! forcing every lookup through a field query. Re-keying by the (already
//! unique) email turns those into point reads. Old keys are deleted after
//! the new document is written, so an interrupted run leaves at worst a
//! duplicate, never a loss.

use std::sync::Arc;

use loanmitra_access::{DocumentStore, store::collections};

use super::{CommandError, connect_default};

pub async fn admin_users() -> Result<(), CommandError> {
    let store = Arc::new(connect_default().await?) as Arc<dyn DocumentStore>;

    let rows = store.list(collections::ADMIN_USERS, None).await?;
    let mut rekeyed = 0usize;
    let mut skipped = 0usize;

    for (key, doc) in rows {
        let Some(email) = doc.get("email").and_then(|v| v.as_str()).map(str::to_owned) else {
            tracing::warn!(%key, "admin_users document has no email; skipping");
            skipped += 1;
            continue;
        };
        if key == email {
            skipped += 1;
            continue;
        }
        store.put(collections::ADMIN_USERS, &email, doc).await?;
        store.delete(collections::ADMIN_USERS, &key).await?;
        rekeyed += 1;
    }

    tracing::info!(rekeyed, skipped, "admin_users rekey complete");
    Ok(())
}
