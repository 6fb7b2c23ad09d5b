//! Document shapes stored in the external document store.
//!
//! The store itself is not owned by this system; these types only pin down
//! the shapes the access-control core and the two services depend on.
//! Serialization matches the snake_case field names used by the seeding
//! tools, so documents round-trip without adapters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Email, LeadCategory, ManagerRef, RecordStatus, StaffRole};

/// A staff member on the agent roster.
///
/// The store key is carried alongside, not inside, the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Human-facing code (e.g. "AGT-104"), distinct from the store key.
    pub agent_code: String,
    pub name: String,
    pub email: Email,
    pub role: StaffRole,
    /// Legacy manager reference: may be an agent store key, an agent code,
    /// or an admin store key. Resolved by the hierarchy probe chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    /// Tagged replacement for `manager_id` on records written going forward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_ref: Option<ManagerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    /// Explicit module grants overriding the role defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
}

/// Legacy per-email admin document.
///
/// Maintained for backward compatibility; redundant with the consolidated
/// authorization registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserRecord {
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Working status of a lead, advanced by backoffice staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

/// A visitor-submitted lead.
///
/// `data` is the free-form mapping of submitted form fields; the core never
/// interprets it beyond display and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub category: LeadCategory,
    pub created_at: DateTime<Utc>,
    pub data: Map<String, Value>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A branch office.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}
