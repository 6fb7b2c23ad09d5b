//! LoanMitra access-control core.
//!
//! The two staff panels originally each carried their own copy of the
//! authorization logic; this crate is the single implementation both the
//! site and the backoffice use:
//!
//! - [`store`] - the document-store boundary (trait, in-memory and
//!   `PostgreSQL` JSONB implementations)
//! - [`identity`] - the external identity-provider adapter
//! - [`resolver`] - email -> [`loanmitra_core::AccessTier`] resolution over
//!   the allow-list registries and the agent roster
//! - [`hierarchy`] - the three-probe manager lookup over inconsistently
//!   keyed records
//! - [`guard`] - route-guard decisions consumed by HTTP middleware
//! - [`modules`] - the static navigation registry and visibility filter
//! - [`repo`] - typed repositories over the document store
//! - [`watch`] - identity-driven resolution stream with stale-result guard
//!
//! Every read the resolvers issue is fail-closed: a store error is logged
//! and treated as "not found", never as confirmation of a tier.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod guard;
pub mod hierarchy;
pub mod identity;
pub mod modules;
pub mod repo;
pub mod resolver;
pub mod store;
pub mod watch;

pub use guard::{GuardDecision, LoginReason, evaluate};
pub use hierarchy::{HierarchyResolver, ManagerRecord};
pub use identity::{DevIdentityProvider, Identity, IdentityError, IdentityHub, IdentityProvider};
pub use modules::{MODULES, visible_modules};
pub use repo::{AgentRepository, BranchRepository, LeadRepository, RegistryEntry, RegistryRepository};
pub use resolver::{AccessResolver, TierResolution};
pub use store::{Document, DocumentStore, MemoryStore, PgDocumentStore, StoreError};
pub use watch::{AccessWatch, GuardState};
