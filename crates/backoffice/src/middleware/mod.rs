//! Middleware and extractors for the backoffice.

pub mod auth;
pub mod session;

pub use auth::{RequireStaff, RequireSuperuser, require_capability};
pub use session::create_session_layer;
