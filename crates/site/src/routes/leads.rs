//! Lead capture endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

use loanmitra_core::{Email, LeadCategory};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Submit a lead form.
///
/// The body is the free-form field map of the submitted form. Only shape
/// validation happens here: the map must be non-empty and, when an `email`
/// field is present, it must parse. Staff interpret the rest.
pub async fn submit(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(data): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>)> {
    let category: LeadCategory = category
        .parse()
        .map_err(|_| AppError::NotFound(format!("unknown lead category: {category}")))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("empty submission".to_string()));
    }
    if let Some(email) = data.get("email").and_then(Value::as_str)
        && Email::parse(email).is_err()
    {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }

    let key = state.leads().submit(category, data).await?;
    tracing::info!(%category, lead = %key, "lead submitted");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": key.as_str() })),
    ))
}
