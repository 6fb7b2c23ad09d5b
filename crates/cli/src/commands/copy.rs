//! Collection copy between two store instances.
//!
//! Used for environment promotion and store migrations. Copies are
//! whole-document `put`s, so re-running is idempotent.

use secrecy::SecretString;

use loanmitra_access::{DocumentStore, PgDocumentStore, store::collections};

use super::CommandError;

/// Every collection the workspace knows about.
const ALL_COLLECTIONS: &[&str] = &[
    collections::AGENTS,
    collections::ADMINS,
    collections::ADMIN_USERS,
    collections::LEADS,
    collections::BRANCHES,
    collections::CONFIG,
    collections::AUTHORIZATION,
];

/// Copy `collection_filter` (or all known collections) from `source` to
/// `dest`.
pub async fn run(
    source: &str,
    dest: &str,
    collection_filter: &[String],
) -> Result<(), CommandError> {
    let source = PgDocumentStore::connect(&SecretString::from(source.to_owned())).await?;
    let dest = PgDocumentStore::connect(&SecretString::from(dest.to_owned())).await?;

    let collections: Vec<&str> = if collection_filter.is_empty() {
        ALL_COLLECTIONS.to_vec()
    } else {
        collection_filter.iter().map(String::as_str).collect()
    };

    for collection in collections {
        let rows = source.list(collection, None).await?;
        let count = rows.len();
        for (key, doc) in rows {
            dest.put(collection, &key, doc).await?;
        }
        tracing::info!(collection, count, "collection copied");
    }

    Ok(())
}
