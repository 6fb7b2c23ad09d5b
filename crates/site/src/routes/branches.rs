//! Branch listing for the public site.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use loanmitra_core::Branch;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BranchView {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

impl From<Branch> for BranchView {
    fn from(b: Branch) -> Self {
        Self {
            name: b.name,
            address: b.address,
            city: b.city,
            state: b.state,
            phone: b.phone,
            map_link: b.map_link,
        }
    }
}

/// Active branches only; store keys and statuses stay internal.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BranchView>>> {
    let branches = state.branches().list_active().await?;
    Ok(Json(
        branches.into_iter().map(|(_, b)| b.into()).collect(),
    ))
}
