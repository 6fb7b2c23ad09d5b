//! Sign-in and session endpoints.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use loanmitra_access::{GuardDecision, LoginReason, evaluate, visible_modules, MODULES};

use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{CurrentStaff, session_keys};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Provider-specific assertion (verified email token).
    pub assertion: String,
}

/// Interactive sign-in.
///
/// Verifies the assertion with the identity provider, resolves the tier,
/// and only establishes a session for authorized staff. A valid identity
/// without any registry grant is rejected with the "account not
/// authorized" message, distinct from a failed assertion.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let identity = state.identity().sign_in(&req.assertion).await?;
    let resolution = state.resolver().resolve(Some(&identity)).await;

    match evaluate(&resolution, Some(&identity.verified_email), None) {
        GuardDecision::Authorized => {}
        GuardDecision::RedirectToLogin(LoginReason::NotAuthorized)
        | GuardDecision::RedirectToDefault => {
            return Err(AppError::Forbidden(
                "This account is not authorized for the backoffice. Contact an administrator."
                    .to_string(),
            ));
        }
        GuardDecision::RedirectToLogin(LoginReason::NotSignedIn) => {
            return Err(AppError::Unauthorized("Sign-in failed".to_string()));
        }
    }

    let staff = CurrentStaff {
        email: identity.verified_email.clone(),
        tier: resolution.tier,
        capabilities: resolution.capabilities,
    };
    session
        .insert(session_keys::CURRENT_STAFF, staff.clone())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(email = %staff.email, tier = %staff.tier, "staff signed in");
    Ok(Json(me_payload(&staff)))
}

/// Sign out by destroying the session. The identity hub is process-wide
/// and must not be touched here: clearing it would broadcast a sign-out
/// for every session, not just the caller's.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    session
        .delete()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!({ "ok": true })))
}

/// The current staff member plus the modules their capabilities expose.
pub async fn me(RequireStaff(staff): RequireStaff) -> Json<Value> {
    Json(me_payload(&staff))
}

fn me_payload(staff: &CurrentStaff) -> Value {
    let modules = visible_modules(MODULES, &staff.capabilities);
    json!({
        "email": staff.email,
        "tier": staff.tier,
        "modules": modules,
    })
}
