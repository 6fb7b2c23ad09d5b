//! `PostgreSQL`-backed document store.
//!
//! Documents live in a single `document` table as JSONB rows keyed by
//! `(collection, key)`. Queries are runtime-bound so no database is needed
//! at compile time.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tokio::sync::watch;

use super::{Document, DocumentStore, StoreError};

/// How often subscriptions poll for changes.
const SUBSCRIPTION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// [`DocumentStore`] over a `PostgreSQL` JSONB table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect with sensible pool defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be
    /// established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by the CLI, which manages two instances).
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migrate` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT doc FROM document WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<Document, _>("doc"))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let rows = sqlx::query(
            "SELECT key, doc FROM document \
             WHERE collection = $1 AND doc->>$2 = $3 ORDER BY key",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok((
                    r.try_get::<String, _>("key")?,
                    r.try_get::<Document, _>("doc")?,
                ))
            })
            .collect()
    }

    async fn list(
        &self,
        collection: &str,
        limit_to_last: Option<usize>,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let rows = if let Some(n) = limit_to_last {
            sqlx::query(
                "SELECT key, doc FROM ( \
                     SELECT key, doc, created_at FROM document \
                     WHERE collection = $1 \
                     ORDER BY created_at DESC, key DESC LIMIT $2 \
                 ) newest ORDER BY created_at ASC, key ASC",
            )
            .bind(collection)
            .bind(i64::try_from(n).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT key, doc FROM document \
                 WHERE collection = $1 ORDER BY created_at ASC, key ASC",
            )
            .bind(collection)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter()
            .map(|r| {
                Ok((
                    r.try_get::<String, _>("key")?,
                    r.try_get::<Document, _>("doc")?,
                ))
            })
            .collect()
    }

    async fn put(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO document (collection, key, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, key) \
             DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
        )
        .bind(collection)
        .bind(key)
        .bind(doc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<(), StoreError> {
        // JSONB || is a shallow field merge, matching MemoryStore::update.
        sqlx::query(
            "INSERT INTO document (collection, key, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, key) \
             DO UPDATE SET doc = document.doc || EXCLUDED.doc, updated_at = now()",
        )
        .bind(collection)
        .bind(key)
        .bind(partial)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Document,
    ) -> Result<(), StoreError> {
        // Read-modify-write; last-writer-wins is accepted at this layer.
        let mut doc = self
            .get(collection, key)
            .await?
            .unwrap_or_else(|| Document::Object(serde_json::Map::new()));
        if let Some(obj) = doc.as_object_mut() {
            let arr = obj
                .entry(field.to_owned())
                .or_insert_with(|| Document::Array(Vec::new()));
            if let Some(items) = arr.as_array_mut() {
                if items.contains(&value) {
                    return Ok(());
                }
                items.push(value);
            }
        }
        self.put(collection, key, doc).await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM document WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<watch::Receiver<Option<Document>>, StoreError> {
        let current = self.get(collection, key).await?;
        let (tx, rx) = watch::channel(current);

        // Poll-based change feed. TODO: switch to LISTEN/NOTIFY once the
        // document table gets an update trigger.
        let store = self.clone();
        let collection = collection.to_owned();
        let key = key.to_owned();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SUBSCRIPTION_POLL_INTERVAL);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                match store.get(&collection, &key).await {
                    Ok(value) => {
                        tx.send_if_modified(|current| {
                            if *current == value {
                                false
                            } else {
                                *current = value;
                                true
                            }
                        });
                    }
                    Err(error) => {
                        tracing::warn!(%collection, %key, %error, "subscription poll failed");
                    }
                }
            }
        });

        Ok(rx)
    }
}
