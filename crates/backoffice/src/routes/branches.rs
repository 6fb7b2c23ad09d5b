//! Branch administration endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use loanmitra_core::{Branch, BranchKey, RecordStatus};

use crate::error::{AppError, Result};
use crate::middleware::{RequireStaff, require_capability};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>> {
    require_capability(&staff, "branches")?;

    let branches = state.branches().list().await?;
    Ok(Json(json!({
        "branches": branches
            .iter()
            .map(|(key, branch)| branch_view(key, branch))
            .collect::<Vec<_>>(),
    })))
}

pub async fn detail(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "branches")?;

    let key = BranchKey::new(id);
    let branch = state
        .branches()
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("branch {key}")))?;
    Ok(Json(branch_view(&key, &branch)))
}

#[derive(Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub map_link: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    require_capability(&staff, "branches")?;

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let branch = Branch {
        name: req.name,
        address: req.address,
        city: req.city,
        state: req.state,
        phone: req.phone,
        map_link: req.map_link,
        status: RecordStatus::Active,
        created_at: Utc::now(),
    };
    let key = state.branches().create(&branch).await?;
    tracing::info!(branch = %key, staff = %staff.email, "branch created");
    Ok((StatusCode::CREATED, Json(branch_view(&key, &branch))))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub map_link: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Value>> {
    require_capability(&staff, "branches")?;

    let key = BranchKey::new(id);
    if state.branches().get(&key).await?.is_none() {
        return Err(AppError::NotFound(format!("branch {key}")));
    }

    let mut partial = serde_json::Map::new();
    if let Some(name) = req.name {
        partial.insert("name".to_owned(), json!(name));
    }
    if let Some(address) = req.address {
        partial.insert("address".to_owned(), json!(address));
    }
    if let Some(city) = req.city {
        partial.insert("city".to_owned(), json!(city));
    }
    if let Some(state_name) = req.state {
        partial.insert("state".to_owned(), json!(state_name));
    }
    if let Some(phone) = req.phone {
        partial.insert("phone".to_owned(), json!(phone));
    }
    if let Some(map_link) = req.map_link {
        partial.insert("map_link".to_owned(), json!(map_link));
    }
    if partial.is_empty() {
        return Err(AppError::BadRequest("no fields to update".to_string()));
    }

    state.branches().update(&key, Value::Object(partial)).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn deactivate(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "branches")?;

    let key = BranchKey::new(id);
    if state.branches().get(&key).await?.is_none() {
        return Err(AppError::NotFound(format!("branch {key}")));
    }
    state.branches().deactivate(&key).await?;
    Ok(Json(json!({ "ok": true })))
}

fn branch_view(key: &BranchKey, branch: &Branch) -> Value {
    json!({
        "id": key.as_str(),
        "name": branch.name,
        "address": branch.address,
        "city": branch.city,
        "state": branch.state,
        "phone": branch.phone,
        "map_link": branch.map_link,
        "status": branch.status,
        "created_at": branch.created_at,
    })
}
