//! Dashboard counters.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use loanmitra_core::LeadStatus;

use crate::error::Result;
use crate::middleware::{RequireStaff, require_capability};
use crate::state::AppState;

/// Landing-page summary: lead totals and roster size.
pub async fn summary(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>> {
    require_capability(&staff, "dashboard")?;

    let leads = state.leads().all().await?;
    let new_leads = leads
        .iter()
        .filter(|(_, l)| l.status == LeadStatus::New)
        .count();
    let agents = state.agents().list().await?;
    let active_agents = agents.iter().filter(|(_, a)| a.status.is_active()).count();

    Ok(Json(json!({
        "leads_total": leads.len(),
        "leads_new": new_leads,
        "agents_active": active_agents,
    })))
}
