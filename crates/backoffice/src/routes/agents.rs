//! Agent roster endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use loanmitra_core::{Agent, AgentKey, Email, ManagerRef, RecordStatus, StaffRole};
use loanmitra_access::ManagerRecord;

use crate::error::{AppError, Result};
use crate::middleware::{RequireStaff, require_capability};
use crate::state::AppState;

/// Full roster.
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Value>> {
    require_capability(&staff, "agents")?;

    let agents = state.agents().list().await?;
    Ok(Json(json!({
        "agents": agents
            .iter()
            .map(|(key, agent)| agent_view(key, agent))
            .collect::<Vec<_>>(),
    })))
}

#[derive(Deserialize)]
pub struct CreateRequest {
    pub agent_code: String,
    pub name: String,
    pub email: Email,
    pub role: StaffRole,
    pub manager_ref: Option<ManagerRef>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub modules: Option<Vec<String>>,
}

/// Create a roster record. New records always carry the tagged manager
/// reference, never the legacy ambiguous `manager_id`.
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    require_capability(&staff, "agents")?;

    if req.agent_code.trim().is_empty() {
        return Err(AppError::BadRequest("agent_code is required".to_string()));
    }
    if state.agents().find_by_code(&req.agent_code).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "agent code {} is already in use",
            req.agent_code
        )));
    }

    let agent = Agent {
        agent_code: req.agent_code,
        name: req.name,
        email: req.email,
        role: req.role,
        manager_id: None,
        manager_ref: req.manager_ref,
        phone: req.phone,
        department: req.department,
        joining_date: req.joining_date,
        status: RecordStatus::Active,
        created_at: Utc::now(),
        modules: req.modules,
    };
    let key = state.agents().create(&agent).await?;
    tracing::info!(agent = %key, staff = %staff.email, "agent created");

    Ok((StatusCode::CREATED, Json(agent_view(&key, &agent))))
}

/// Roster record detail.
pub async fn detail(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "agents")?;

    let key = AgentKey::new(id);
    let agent = state
        .agents()
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("agent {key}")))?;
    Ok(Json(agent_view(&key, &agent)))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Option<StaffRole>,
    pub manager_ref: Option<ManagerRef>,
    pub modules: Option<Vec<String>>,
}

/// Shallow update of mutable roster fields.
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Value>> {
    require_capability(&staff, "agents")?;

    let key = AgentKey::new(id);
    if state.agents().get(&key).await?.is_none() {
        return Err(AppError::NotFound(format!("agent {key}")));
    }

    let mut partial = serde_json::Map::new();
    if let Some(name) = req.name {
        partial.insert("name".to_owned(), json!(name));
    }
    if let Some(phone) = req.phone {
        partial.insert("phone".to_owned(), json!(phone));
    }
    if let Some(department) = req.department {
        partial.insert("department".to_owned(), json!(department));
    }
    if let Some(role) = req.role {
        partial.insert("role".to_owned(), json!(role));
    }
    if let Some(manager_ref) = req.manager_ref {
        partial.insert("manager_ref".to_owned(), json!(manager_ref));
    }
    if let Some(modules) = req.modules {
        partial.insert("modules".to_owned(), json!(modules));
    }
    if partial.is_empty() {
        return Err(AppError::BadRequest("no fields to update".to_string()));
    }

    state.agents().update(&key, Value::Object(partial)).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Deactivate a roster record. Roster records are never hard-deleted.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "agents")?;

    let key = AgentKey::new(id);
    if state.agents().get(&key).await?.is_none() {
        return Err(AppError::NotFound(format!("agent {key}")));
    }
    state.agents().deactivate(&key).await?;
    tracing::info!(agent = %key, staff = %staff.email, "agent deactivated");
    Ok(Json(json!({ "ok": true })))
}

/// Resolved manager for a roster record.
///
/// All probes missing is not an error: the response carries an explicit
/// "manager details not found" empty state for the UI to render.
pub async fn manager(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "agents")?;

    let key = AgentKey::new(id);
    let agent = state
        .agents()
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("agent {key}")))?;

    let manager = state.hierarchy().resolve_manager(&agent).await;
    Ok(Json(match manager {
        Some(ManagerRecord::Agent { key, agent }) => json!({
            "found": true,
            "kind": "agent",
            "id": key.as_str(),
            "name": agent.name,
            "email": agent.email,
            "role": agent.role,
        }),
        Some(ManagerRecord::Admin { key, record }) => json!({
            "found": true,
            "kind": "admin",
            "id": key.as_str(),
            "name": record.name,
            "email": record.email,
            "role": "admin",
        }),
        None => json!({
            "found": false,
            "message": "manager details not found",
        }),
    }))
}

fn agent_view(key: &AgentKey, agent: &Agent) -> Value {
    json!({
        "id": key.as_str(),
        "agent_code": agent.agent_code,
        "name": agent.name,
        "email": agent.email,
        "role": agent.role,
        "manager_id": agent.manager_id,
        "manager_ref": agent.manager_ref,
        "phone": agent.phone,
        "department": agent.department,
        "joining_date": agent.joining_date,
        "status": agent.status,
        "created_at": agent.created_at,
        "modules": agent.modules,
    })
}
