//! Lead management endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};

use loanmitra_core::{Lead, LeadCategory, LeadKey, LeadStatus};

use crate::error::{AppError, Result};
use crate::middleware::{RequireStaff, require_capability};
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<LeadCategory>,
    pub limit: Option<usize>,
}

/// Recent leads, newest first, optionally filtered by category.
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    require_capability(&staff, "leads")?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let mut leads = state.leads().recent(limit).await?;
    if let Some(category) = query.category {
        leads.retain(|(_, l)| l.category == category);
    }
    leads.reverse();

    Ok(Json(json!({
        "leads": leads
            .iter()
            .map(|(key, lead)| lead_view(key, lead))
            .collect::<Vec<_>>(),
    })))
}

/// Lead detail.
pub async fn detail(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_capability(&staff, "leads")?;

    let key = LeadKey::new(id);
    let lead = state
        .leads()
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("lead {key}")))?;
    Ok(Json(lead_view(&key, &lead)))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: LeadStatus,
    pub note: Option<String>,
}

/// Advance the working status and optionally replace the note.
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Value>> {
    require_capability(&staff, "leads")?;

    let key = LeadKey::new(id);
    if state.leads().get(&key).await?.is_none() {
        return Err(AppError::NotFound(format!("lead {key}")));
    }
    state
        .leads()
        .set_status(&key, req.status, req.note.as_deref())
        .await?;
    tracing::info!(lead = %key, staff = %staff.email, "lead status updated");
    Ok(Json(json!({ "ok": true })))
}

/// CSV export of every lead. Read-only; the export never mutates.
pub async fn export_csv(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<impl IntoResponse> {
    require_capability(&staff, "leads")?;

    let leads = state.leads().all().await?;
    let body = render_csv(&leads);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        body,
    ))
}

fn lead_view(key: &LeadKey, lead: &Lead) -> Value {
    json!({
        "id": key.as_str(),
        "category": lead.category.to_string(),
        "created_at": lead.created_at,
        "status": lead.status,
        "note": lead.note,
        "data": lead.data,
    })
}

/// Minimal CSV rendering: fixed columns plus the submitted fields as one
/// JSON column, so uneven form shapes never skew the table.
fn render_csv(leads: &[(LeadKey, Lead)]) -> String {
    let mut out = String::from("id,category,created_at,status,note,data\n");
    for (key, lead) in leads {
        let data = serde_json::to_string(&lead.data).unwrap_or_default();
        out.push_str(&csv_field(key.as_str()));
        out.push(',');
        out.push_str(&csv_field(&lead.category.to_string()));
        out.push(',');
        out.push_str(&csv_field(&lead.created_at.to_rfc3339()));
        out.push(',');
        out.push_str(&csv_field(&format!("{:?}", lead.status).to_lowercase()));
        out.push(',');
        out.push_str(&csv_field(lead.note.as_deref().unwrap_or("")));
        out.push(',');
        out.push_str(&csv_field(&data));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_csv_escapes_quotes_and_commas() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_csv_shape() {
        let mut data = serde_json::Map::new();
        data.insert("name".to_owned(), json!("A, B"));
        let lead = Lead {
            category: LeadCategory::Loan,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            data,
            status: LeadStatus::New,
            note: None,
        };
        let csv = render_csv(&[(LeadKey::new("l1"), lead)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "id,category,created_at,status,note,data");
        let row = lines.next().unwrap();
        assert!(row.starts_with("l1,loan,"));
        assert!(row.contains("\"{\"\"name\"\":\"\"A, B\"\"}\""));
    }
}
