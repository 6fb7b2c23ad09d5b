//! Authorization registries.
//!
//! Four generations of allow-list data coexist in the store:
//!
//! 1. `authorization_registry` - the consolidated per-email registry that
//!    new grants are written to
//! 2. `config/superusers` - legacy array of superuser emails
//! 3. `config/admin_allowlist` - legacy array of admin emails
//! 4. `admin_users` - legacy per-email admin documents
//!
//! The resolver consults the consolidated registry first and falls back to
//! the legacy shapes, so reads work before, during and after the
//! `consolidate` migration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loanmitra_core::{AccessTier, AdminUserRecord, Email, RecordStatus};

use crate::store::{DocumentStore, StoreError, collections, config_keys, decode};

/// A grant in the consolidated registry, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub email: Email,
    pub tier: AccessTier,
    #[serde(default)]
    pub status: RecordStatus,
    /// Email of the superuser who wrote the grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<Email>,
    pub granted_at: DateTime<Utc>,
}

/// Reads and writes across the four registries.
#[derive(Clone)]
pub struct RegistryRepository {
    store: Arc<dyn DocumentStore>,
}

impl RegistryRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Consolidated entry for an email, active or revoked.
    ///
    /// Revoked entries are returned so the resolver can treat an explicit
    /// revocation as a denial instead of falling through to the legacy
    /// registries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed entry.
    pub async fn consolidated_lookup(
        &self,
        email: &Email,
    ) -> Result<Option<RegistryEntry>, StoreError> {
        let Some(doc) = self
            .store
            .get(collections::AUTHORIZATION, email.as_str())
            .await?
        else {
            return Ok(None);
        };
        let entry = decode(collections::AUTHORIZATION, email.as_str(), doc)?;
        Ok(Some(entry))
    }

    /// All consolidated grants, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed entry.
    pub async fn entries(&self) -> Result<Vec<RegistryEntry>, StoreError> {
        self.store
            .list(collections::AUTHORIZATION, None)
            .await?
            .into_iter()
            .map(|(key, doc)| decode(collections::AUTHORIZATION, &key, doc))
            .collect()
    }

    /// Write a grant to the consolidated registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn grant(
        &self,
        email: &Email,
        tier: AccessTier,
        granted_by: Option<&Email>,
    ) -> Result<(), StoreError> {
        let entry = RegistryEntry {
            email: email.clone(),
            tier,
            status: RecordStatus::Active,
            granted_by: granted_by.cloned(),
            granted_at: Utc::now(),
        };
        self.store
            .put(
                collections::AUTHORIZATION,
                email.as_str(),
                serde_json::to_value(entry).map_err(|source| StoreError::Malformed {
                    path: format!("{}/{}", collections::AUTHORIZATION, email.as_str()),
                    source,
                })?,
            )
            .await
    }

    /// Deactivate a consolidated grant. The entry is kept for audit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn revoke(&self, email: &Email) -> Result<(), StoreError> {
        self.store
            .update(
                collections::AUTHORIZATION,
                email.as_str(),
                serde_json::json!({ "status": "inactive" }),
            )
            .await
    }

    /// Emails in the legacy superuser registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read.
    pub async fn superuser_emails(&self) -> Result<Vec<String>, StoreError> {
        self.email_array(config_keys::SUPERUSERS, "emails").await
    }

    /// Legacy superuser membership check.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read.
    pub async fn is_superuser(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self
            .superuser_emails()
            .await?
            .iter()
            .any(|e| e == email.as_str()))
    }

    /// Emails in the legacy admin allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read.
    pub async fn allowlisted_admin_emails(&self) -> Result<Vec<String>, StoreError> {
        self.email_array(config_keys::ADMIN_ALLOWLIST, "admin_emails")
            .await
    }

    /// Legacy admin allow-list membership check.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read.
    pub async fn is_allowlisted_admin(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self
            .allowlisted_admin_emails()
            .await?
            .iter()
            .any(|e| e == email.as_str()))
    }

    /// Append an email to the legacy superuser registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn add_superuser(&self, email: &Email) -> Result<(), StoreError> {
        self.store
            .append(
                collections::CONFIG,
                config_keys::SUPERUSERS,
                "emails",
                serde_json::json!(email.as_str()),
            )
            .await
    }

    /// Append an email to the legacy admin allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn add_allowlisted_admin(&self, email: &Email) -> Result<(), StoreError> {
        self.store
            .append(
                collections::CONFIG,
                config_keys::ADMIN_ALLOWLIST,
                "admin_emails",
                serde_json::json!(email.as_str()),
            )
            .await
    }

    /// Active legacy per-email admin document, if present.
    ///
    /// The collection is keyed by opaque store keys, so this is a field
    /// query rather than a point read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read.
    pub async fn active_admin_user(
        &self,
        email: &Email,
    ) -> Result<Option<AdminUserRecord>, StoreError> {
        let hits = self
            .store
            .find_eq(collections::ADMIN_USERS, "email", email.as_str())
            .await?;
        for (key, doc) in hits {
            let record: AdminUserRecord = decode(collections::ADMIN_USERS, &key, doc)?;
            if record.status.is_active() {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// All legacy per-email admin documents with their store keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a failed read or a malformed record.
    pub async fn admin_users(&self) -> Result<Vec<(String, AdminUserRecord)>, StoreError> {
        self.store
            .list(collections::ADMIN_USERS, None)
            .await?
            .into_iter()
            .map(|(key, doc)| {
                let record = decode(collections::ADMIN_USERS, &key, doc)?;
                Ok((key, record))
            })
            .collect()
    }

    async fn email_array(&self, key: &str, field: &str) -> Result<Vec<String>, StoreError> {
        let Some(doc) = self.store.get(collections::CONFIG, key).await? else {
            return Ok(Vec::new());
        };
        Ok(doc
            .get(field)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default())
    }
}
