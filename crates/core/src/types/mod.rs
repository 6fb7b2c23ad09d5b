//! Shared primitive types.

pub mod capability;
pub mod email;
pub mod emi;
pub mod key;
pub mod manager_ref;
pub mod module;
pub mod tier;

pub use capability::{CapabilitySet, WILDCARD};
pub use email::{Email, EmailError};
pub use emi::{EmiError, EmiQuote};
pub use key::{AdminKey, AgentKey, BranchKey, LeadKey};
pub use manager_ref::ManagerRef;
pub use module::ModuleDescriptor;
pub use tier::{AccessTier, LeadCategory, RecordStatus, StaffRole};
