//! LoanMitra Core - Shared types library.
//!
//! This crate provides common types used across all LoanMitra components:
//! - `site` - Public marketing and lead-capture site
//! - `backoffice` - Internal staff panel (guarded routes)
//! - `access` - Shared access-control core (resolvers, route guard)
//! - `cli` - Command-line tools for seeding and migrations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Tiers, capabilities, emails, document keys, modules, EMI
//! - [`model`] - Document shapes stored in the external document store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod model;
pub mod types;

pub use model::*;
pub use types::*;
