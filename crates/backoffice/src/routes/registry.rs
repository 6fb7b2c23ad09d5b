//! Consolidated authorization-registry management. Superuser only.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use loanmitra_core::{AccessTier, Email};

use crate::error::{AppError, Result};
use crate::middleware::RequireSuperuser;
use crate::state::AppState;

/// All consolidated entries, including revoked ones (kept for audit).
pub async fn list(
    State(state): State<AppState>,
    RequireSuperuser(_staff): RequireSuperuser,
) -> Result<Json<Value>> {
    let entries = state.registry().entries().await?;
    Ok(Json(json!({ "entries": entries })))
}

#[derive(Deserialize)]
pub struct GrantRequest {
    pub email: Email,
    pub tier: AccessTier,
}

/// Write a grant.
///
/// Writes land in the consolidated registry and, during the migration
/// window, are mirrored into the legacy array registries so older readers
/// keep agreeing with newer ones.
pub async fn grant(
    State(state): State<AppState>,
    RequireSuperuser(staff): RequireSuperuser,
    Json(req): Json<GrantRequest>,
) -> Result<Json<Value>> {
    if !matches!(
        req.tier,
        AccessTier::Agent | AccessTier::Manager | AccessTier::Admin | AccessTier::Superuser
    ) {
        return Err(AppError::BadRequest(format!(
            "cannot grant tier {}",
            req.tier
        )));
    }

    state
        .registry()
        .grant(&req.email, req.tier, Some(&staff.email))
        .await?;

    match req.tier {
        AccessTier::Superuser => state.registry().add_superuser(&req.email).await?,
        AccessTier::Admin => state.registry().add_allowlisted_admin(&req.email).await?,
        _ => {}
    }

    tracing::info!(email = %req.email, tier = %req.tier, granted_by = %staff.email, "registry grant");
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct RevokeRequest {
    pub email: Email,
}

/// Deactivate a consolidated grant.
///
/// The legacy arrays are append-only at the store layer, but the resolver
/// treats a revoked consolidated entry as an explicit denial, so the stale
/// array memberships cannot resurrect the grant.
pub async fn revoke(
    State(state): State<AppState>,
    RequireSuperuser(staff): RequireSuperuser,
    Json(req): Json<RevokeRequest>,
) -> Result<Json<Value>> {
    if req.email == staff.email {
        return Err(AppError::BadRequest(
            "cannot revoke your own access".to_string(),
        ));
    }
    state.registry().revoke(&req.email).await?;
    tracing::info!(email = %req.email, revoked_by = %staff.email, "registry revoke");
    Ok(Json(json!({ "ok": true })))
}
