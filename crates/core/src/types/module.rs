//! Navigation module descriptors.

use serde::Serialize;

/// One entry in the backoffice navigation registry.
///
/// The registry itself is compiled into the application (see the access
/// crate); nothing here is stored externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    /// Stable identifier.
    pub id: &'static str,
    /// Human-facing label.
    pub label: &'static str,
    /// Route path the module links to.
    pub path: &'static str,
    /// Capability required to see the module.
    pub capability_tag: &'static str,
}
