//! HTTP route handlers for the backoffice.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//!
//! # Auth
//! POST /api/auth/login             - Sign in (identity assertion)
//! POST /api/auth/logout            - Sign out
//! GET  /api/auth/me                - Current staff member + visible modules
//!
//! # Dashboard
//! GET  /api/dashboard              - Counters for the landing page
//!
//! # Leads (capability: leads)
//! GET  /api/leads                  - Recent leads, optional ?category=
//! GET  /api/leads/export.csv       - CSV export (read-only)
//! GET  /api/leads/{id}             - Lead detail
//! POST /api/leads/{id}/status      - Advance status / set note
//!
//! # Agents (capability: agents)
//! GET  /api/agents                 - Roster
//! POST /api/agents                 - Create
//! GET  /api/agents/{id}            - Detail
//! PATCH /api/agents/{id}           - Update fields
//! POST /api/agents/{id}/deactivate - Deactivate (no hard delete)
//! GET  /api/agents/{id}/manager    - Resolved manager or empty state
//!
//! # Branches (capability: branches)
//! GET/POST /api/branches, GET/PATCH /api/branches/{id},
//! POST /api/branches/{id}/deactivate
//!
//! # Registry (superuser only)
//! GET  /api/registry               - Consolidated entries
//! POST /api/registry/grant         - Add/raise a grant
//! POST /api/registry/revoke        - Deactivate a grant
//! ```

pub mod agents;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod leads;
pub mod registry;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the full API route tree.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard", get(dashboard::summary))
        .route("/api/leads", get(leads::list))
        .route("/api/leads/export.csv", get(leads::export_csv))
        .route("/api/leads/{id}", get(leads::detail))
        .route("/api/leads/{id}/status", post(leads::set_status))
        .route("/api/agents", get(agents::list).post(agents::create))
        .route("/api/agents/{id}", get(agents::detail).patch(agents::update))
        .route("/api/agents/{id}/deactivate", post(agents::deactivate))
        .route("/api/agents/{id}/manager", get(agents::manager))
        .route("/api/branches", get(branches::list).post(branches::create))
        .route(
            "/api/branches/{id}",
            get(branches::detail).patch(branches::update),
        )
        .route("/api/branches/{id}/deactivate", post(branches::deactivate))
        .route("/api/registry", get(registry::list))
        .route("/api/registry/grant", post(registry::grant))
        .route("/api/registry/revoke", post(registry::revoke))
}
