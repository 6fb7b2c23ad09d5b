//! Tagged manager references.
//!
//! Legacy roster records hold a bare `manager_id` string that may be an
//! agent store key, a human-facing agent code, or a key into the admin
//! collection - the ambiguity is absorbed at read time by the hierarchy
//! resolver's probe chain. Records written going forward carry a
//! `ManagerRef` instead, deciding the kind at data-entry time.

use serde::{Deserialize, Serialize};

/// A reference to another personnel record, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ManagerRef {
    /// Store key into the agent roster.
    AgentKey(String),
    /// Human-facing agent code (field query, not a store key).
    AgentCode(String),
    /// Store key into the legacy admin collection.
    AdminKey(String),
}

impl ManagerRef {
    /// The referenced value, regardless of kind.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::AgentKey(v) | Self::AgentCode(v) | Self::AdminKey(v) => v,
        }
    }
}
