//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Leads (rate-limited, ~10/min per IP)
//! POST /api/leads/{category}   - Submit a lead form
//!
//! # Branches
//! GET  /api/branches           - Active branch offices
//!
//! # Tools (rate-limited, ~100/min per IP)
//! POST /api/tools/emi          - EMI calculation
//! POST /api/tools/credit-score - Indicative credit-score estimate
//! ```

pub mod branches;
pub mod leads;
pub mod tools;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, lead_rate_limiter};
use crate::state::AppState;

/// Create the lead submission router.
pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/api/leads/{category}", post(leads::submit))
        .layer(lead_rate_limiter())
}

/// Create the calculator tools router.
pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tools/emi", post(tools::emi))
        .route("/api/tools/credit-score", post(tools::credit_score))
        .layer(api_rate_limiter())
}

/// Create the full route tree.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(lead_routes())
        .merge(tool_routes())
        .route("/api/branches", get(branches::list))
}
