//! Document-store boundary.
//!
//! The external system of record is a generic document/key-value store with
//! subscribe semantics. This module pins down the exact surface the rest of
//! the workspace consumes and provides two implementations:
//!
//! - [`MemoryStore`] - in-process, for tests and local development
//! - [`PgDocumentStore`] - JSONB documents in `PostgreSQL` via sqlx
//!
//! Writes are single-document; `update` is a shallow field merge and
//! `append` has set semantics (no duplicate array members). Concurrent
//! writers are last-writer-wins at the store layer, which is acceptable for
//! the low-contention, human-operated usage pattern.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::watch;

/// A stored document. Always object-shaped at the top level.
pub type Document = serde_json::Value;

/// Collection names used across the workspace.
pub mod collections {
    /// Agent roster.
    pub const AGENTS: &str = "agents";
    /// Legacy admin collection (cross-collection manager references).
    pub const ADMINS: &str = "admins";
    /// Legacy per-email admin documents.
    pub const ADMIN_USERS: &str = "admin_users";
    /// Visitor-submitted leads.
    pub const LEADS: &str = "leads";
    /// Branch offices.
    pub const BRANCHES: &str = "branches";
    /// Singleton configuration documents (array registries).
    pub const CONFIG: &str = "config";
    /// Consolidated authorization registry, keyed by email.
    pub const AUTHORIZATION: &str = "authorization_registry";
}

/// Keys of the singleton documents in the `config` collection.
pub mod config_keys {
    /// Superuser registry: `{ "emails": [...] }`.
    pub const SUPERUSERS: &str = "superusers";
    /// Admin allow-list: `{ "admin_emails": [...] }`.
    pub const ADMIN_ALLOWLIST: &str = "admin_allowlist";
}

/// Errors from the document-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the read or write.
    #[error("permission denied for {path}")]
    PermissionDenied {
        /// `collection/key` the operation targeted.
        path: String,
    },

    /// A stored document does not match the expected shape.
    #[error("malformed document at {path}: {source}")]
    Malformed {
        /// `collection/key` of the offending document.
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// The store surface consumed by the resolvers and repositories.
///
/// Object-safe so call sites can hold `Arc<dyn DocumentStore>` and tests
/// can substitute counting or failing fakes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Equality query on a top-level field, returning `(key, document)`
    /// pairs in key order.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Ordered range read over a collection, oldest first. With
    /// `limit_to_last`, only the newest `n` documents are returned (still
    /// oldest first).
    async fn list(
        &self,
        collection: &str,
        limit_to_last: Option<usize>,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Create or replace a document.
    async fn put(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError>;

    /// Shallow-merge `partial` into the document, creating it if absent.
    async fn update(&self, collection: &str, key: &str, partial: Document)
    -> Result<(), StoreError>;

    /// Append `value` to the array at `field`, creating document and array
    /// as needed. Set semantics: an already-present value is not duplicated.
    async fn append(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Document,
    ) -> Result<(), StoreError>;

    /// Remove a document. Missing documents are not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Live subscription: receives the current value immediately and every
    /// subsequent change. Dropping the receiver unsubscribes.
    async fn subscribe(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<watch::Receiver<Option<Document>>, StoreError>;
}

/// Deserialize a document into a typed shape, tagging decode failures with
/// the document path.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the document does not match `T`.
pub fn decode<T: DeserializeOwned>(
    collection: &str,
    key: &str,
    doc: Document,
) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|source| StoreError::Malformed {
        path: format!("{collection}/{key}"),
        source,
    })
}

/// Shallow field merge used by [`MemoryStore::update`] and the append
/// read-modify-write paths.
pub(crate) fn merge_shallow(target: &mut Document, partial: Document) {
    match (target.as_object_mut(), partial) {
        (Some(target), Document::Object(partial)) => {
            for (k, v) in partial {
                target.insert(k, v);
            }
        }
        (_, partial) => *target = partial,
    }
}
